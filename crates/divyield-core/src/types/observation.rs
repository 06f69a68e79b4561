//! Vendor observation rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Date;

/// Access to the two dates the maturity reconciler reads and rewrites.
///
/// Implemented by [`ObservationRow`]; callers with their own row layout can
/// implement it to reconcile those rows directly.
pub trait Maturity {
    /// The observation (trade) date of the row.
    fn observation_date(&self) -> Date;

    /// The recorded option expiration, `None` when missing or malformed.
    fn expiration(&self) -> Option<Date>;

    /// Replaces the recorded expiration.
    fn set_expiration(&mut self, expiration: Date);
}

/// One implied dividend yield observation for an index option maturity.
///
/// Field order and names follow the vendor table (`exchange_d` is the
/// vendor's exchange column). Several rows share an observation `date`, one
/// per open maturity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRow {
    /// Vendor security identifier.
    pub secid: i64,
    /// Observation date.
    pub date: Date,
    /// CUSIP of the underlying index.
    pub cusip: Option<String>,
    /// Index ticker (SPX, DJX, NDX, ...).
    pub ticker: String,
    /// Standard industrial classification code.
    pub sic: Option<String>,
    /// Vendor index flag.
    pub index_flag: Option<String>,
    /// Primary exchange designator.
    pub exchange_d: Option<String>,
    /// Share class.
    pub class: Option<String>,
    /// Issue type code.
    pub issue_type: Option<String>,
    /// Industry group code.
    pub industry_group: Option<String>,
    /// Option expiration as recorded by the vendor.
    pub expiration: Option<Date>,
    /// Implied dividend yield.
    pub rate: Option<Decimal>,
}

impl ObservationRow {
    /// Creates a row with the identifying fields set and no metadata.
    pub fn new(
        secid: i64,
        ticker: impl Into<String>,
        date: Date,
        expiration: Option<Date>,
        rate: Option<Decimal>,
    ) -> Self {
        Self {
            secid,
            date,
            cusip: None,
            ticker: ticker.into(),
            sic: None,
            index_flag: None,
            exchange_d: None,
            class: None,
            issue_type: None,
            industry_group: None,
            expiration,
            rate,
        }
    }

    /// Calendar days from the observation date to expiration.
    pub fn days_to_expiration(&self) -> Option<i64> {
        self.expiration.map(|exp| self.date.days_between(&exp))
    }
}

impl Maturity for ObservationRow {
    fn observation_date(&self) -> Date {
        self.date
    }

    fn expiration(&self) -> Option<Date> {
        self.expiration
    }

    fn set_expiration(&mut self, expiration: Date) {
        self.expiration = Some(expiration);
    }
}
