//! Date type for expiration and observation dates.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A calendar date.
///
/// Newtype over `chrono::NaiveDate`, serialised as `YYYY-MM-DD`.
///
/// # Example
///
/// ```rust
/// use chrono::Weekday;
/// use divyield_core::types::Date;
///
/// let third_friday = Date::nth_weekday_of_month(2020, 3, Weekday::Fri, 3).unwrap();
/// assert_eq!(third_friday, Date::from_ymd(2020, 3, 20).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Earliest representable date.
    pub const MIN: Date = Date(NaiveDate::MIN);
    /// Latest representable date.
    pub const MAX: Date = Date(NaiveDate::MAX);

    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Parses the date layouts found in vendor exports.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
    /// `YYYYMMDD` and `MM/DD/YYYY`. Returns `None` for blank or unrecognised
    /// input.
    #[must_use]
    pub fn parse_vendor(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(date) = Self::parse(s) {
            return Some(date);
        }
        for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
                return Some(Date(dt.date()));
            }
        }
        ["%Y%m%d", "%m/%d/%Y"]
            .iter()
            .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
            .map(Date)
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Checks if the date is a Saturday or Sunday.
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Adds a number of calendar days to the date, saturating at
    /// [`Date::MIN`] and [`Date::MAX`].
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        self.checked_add_days(days)
            .unwrap_or(if days < 0 { Self::MIN } else { Self::MAX })
    }

    /// Adds a number of calendar days, or `None` past the representable range.
    #[must_use]
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        chrono::Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Date)
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the first day of the date's month.
    #[must_use]
    pub fn first_of_month(&self) -> Self {
        Date(self.0.with_day(1).unwrap_or(self.0))
    }

    /// Returns the first day of the following month, or `None` past
    /// [`Date::MAX`].
    #[must_use]
    pub fn first_of_next_month(&self) -> Option<Self> {
        let (year, month) = if self.month() == 12 {
            (self.year().checked_add(1)?, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).map(Date)
    }

    /// Returns the `n`th occurrence (1-based) of `weekday` in the given month.
    ///
    /// Returns `None` when the month has fewer than `n` such weekdays or the
    /// month is invalid.
    #[must_use]
    pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let offset = (weekday.num_days_from_monday() + 7
            - first.weekday().num_days_from_monday())
            % 7;
        let day = 1 + offset + (n - 1) * 7;
        NaiveDate::from_ymd_opt(year, month, day).map(Date)
    }

    /// Returns the last occurrence of `weekday` in the given month.
    #[must_use]
    pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<Self> {
        let last_day = Date::from_ymd(year, month, 1)
            .ok()?
            .first_of_next_month()?
            .add_days(-1);
        let back = (last_day.weekday().num_days_from_monday() + 7
            - weekday.num_days_from_monday())
            % 7;
        Some(last_day.add_days(-i64::from(back)))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Self;

    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Self;

    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}
