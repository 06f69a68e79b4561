//! # Divyield Traits
//!
//! Capabilities the reconciliation pipeline is built from.
//!
//! This crate contains ONLY trait definitions and identifiers.
//! Implementations live in extension crates such as `divyield-ext-file`.
//!
//! ## Module Structure
//!
//! - [`source`]: vendor observation sources
//! - [`store`]: persistence of raw and reconciled datasets
//! - [`ids`]: index identifiers and dataset kinds
//!
//! ## Dependency Injection
//!
//! The pipeline receives both capabilities from its caller:
//!
//! ```ignore
//! let raw = source.fetch(&index, start, end)?;
//! store.save(&index, DatasetKind::Raw, &raw)?;
//! let front = reconciler.reconcile(store.load(&index, DatasetKind::Raw)?, start, end)?;
//! store.save(&index, DatasetKind::Reconciled, &front)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use error::{TraitError, TraitResult};
pub use ids::*;
pub use source::ObservationSource;
pub use store::ObservationStore;
