//! # Divyield Core
//!
//! Date logic for reconciling vendor implied dividend yield tables with the
//! listed index option expiration cycle.
//!
//! - **Calendars**: rule-based US market calendars, JSON holiday lists and
//!   ordered trading-day sets
//! - **Expirations**: third-Friday expirations moved back onto trading days
//! - **Reconciliation**: rewriting day-after expirations and keeping the
//!   front quarterly maturities per observation date
//!
//! ## Example
//!
//! ```rust
//! use divyield_core::prelude::*;
//!
//! let start = Date::from_ymd(2020, 1, 1).unwrap();
//! let end = Date::from_ymd(2020, 12, 31).unwrap();
//! let dates = generate_canonical_expirations(
//!     Market::UsFinancialMarkets.calendar(),
//!     start,
//!     end,
//!     &QUARTERLY_MONTHS,
//!     DayRule::THIRD_FRIDAY,
//! )
//! .unwrap();
//! assert_eq!(dates.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unreadable_literal)]

pub mod calendars;
pub mod error;
pub mod expirations;
pub mod reconcile;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{Calendar, Market, TradingCalendar, WeekendCalendar};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::expirations::{
        generate_canonical_expirations, CanonicalExpiration, DayRule, ExpirationGenerator,
        QUARTERLY_MONTHS,
    };
    pub use crate::reconcile::{reconcile, MaturityReconciler, ReconcileReport};
    pub use crate::types::{Date, Maturity, ObservationRow};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, ObservationRow};
