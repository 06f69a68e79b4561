//! Divyield Configuration Layer
//!
//! One explicit [`PipelineConfig`] value carries everything an entry point
//! needs: where datasets live, the observation date range, vendor
//! credentials, and the reconciliation settings.
//!
//! Values are resolved in three layers, later layers winning:
//!
//! 1. defaults
//! 2. a TOML file
//! 3. `DIVYIELD_*` environment variables
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Example
//!
//! ```rust
//! use divyield_config::{PipelineConfig, Validate};
//!
//! let config = PipelineConfig::from_toml_str(r#"
//!     data_dir = "./data"
//!     start_date = "2020-01-01"
//!     end_date = "2020-12-31"
//!     indices = ["SPX"]
//! "#).unwrap();
//!
//! assert!(config.is_valid());
//! assert_eq!(config.maturities_per_date, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod pipeline;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use pipeline::{
    Credentials, PipelineConfig, ENV_DATA_DIR, ENV_END_DATE, ENV_INDICES, ENV_MARKET,
    ENV_PASSWORD, ENV_START_DATE, ENV_USERNAME,
};
