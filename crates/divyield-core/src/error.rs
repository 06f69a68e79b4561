//! Error types for calendar and maturity operations.
//!
//! Every date-logic failure is fatal to the call that raised it and is
//! returned to the caller unchanged.

use thiserror::Error;

use crate::types::Date;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid or unparseable date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Range whose start lies after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: Date,
        /// Requested end date.
        end: Date,
    },

    /// Calendar month outside 1..=12.
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// Day selection rule that cannot be parsed or evaluated.
    #[error("Invalid day rule: {reason}")]
    InvalidDayRule {
        /// Description of the problem.
        reason: String,
    },

    /// A nominal expiration could not be moved onto a trading day within the
    /// allowed number of backward steps.
    #[error("Calendar gap: no trading day within {attempts} days on or before {nominal}")]
    CalendarGap {
        /// Unadjusted expiration date.
        nominal: Date,
        /// Number of calendar days searched.
        attempts: u32,
    },

    /// The requested range contains no canonical expiration dates.
    #[error("Empty range: no canonical expiration dates between {start} and {end}")]
    EmptyRange {
        /// Requested start date.
        start: Date,
        /// Requested end date.
        end: Date,
    },

    /// Calendar construction or loading error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid day rule error.
    #[must_use]
    pub fn invalid_day_rule(reason: impl Into<String>) -> Self {
        Self::InvalidDayRule {
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_calendar_gap_display() {
        let err = CoreError::CalendarGap {
            nominal: Date::from_ymd(2020, 3, 20).unwrap(),
            attempts: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("10 days"));
        assert!(msg.contains("2020-03-20"));
    }

    #[test]
    fn test_empty_range_display() {
        let err = CoreError::EmptyRange {
            start: Date::from_ymd(2020, 1, 1).unwrap(),
            end: Date::from_ymd(2020, 2, 1).unwrap(),
        };
        assert!(err.to_string().starts_with("Empty range"));
    }
}
