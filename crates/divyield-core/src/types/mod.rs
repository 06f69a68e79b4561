//! Domain types for implied dividend yield data.
//!
//! - [`Date`]: Calendar date for observation and expiration dates
//! - [`ObservationRow`]: One vendor row (index, date, expiration, rate, metadata)
//! - [`Maturity`]: Access to the dates the reconciler works on

mod date;
mod observation;

pub use date::Date;
pub use observation::{Maturity, ObservationRow};
