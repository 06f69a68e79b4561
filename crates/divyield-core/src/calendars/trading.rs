//! Ordered sets of trading days.

use serde::{Deserialize, Serialize};

use super::Calendar;
use crate::types::Date;

/// Strictly increasing list of valid trading dates over a bounded range.
///
/// Produced by [`Calendar::valid_days`] or built directly from a list of
/// dates (synthetic calendars). Also usable as a [`Calendar`]: a date is a
/// business day exactly when it is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Date>", into = "Vec<Date>")]
pub struct TradingCalendar {
    days: Vec<Date>,
}

impl TradingCalendar {
    /// Builds a trading calendar from arbitrary dates; sorts and deduplicates.
    pub fn from_dates(dates: impl IntoIterator<Item = Date>) -> Self {
        let mut days: Vec<Date> = dates.into_iter().collect();
        days.sort_unstable();
        days.dedup();
        Self { days }
    }

    /// Lists the business days of `calendar` between `start` and `end`
    /// inclusive.
    pub fn from_calendar<C: Calendar + ?Sized>(calendar: &C, start: Date, end: Date) -> Self {
        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            if calendar.is_business_day(current) {
                days.push(current);
            }
            match current.checked_add_days(1) {
                Some(next) => current = next,
                None => break,
            }
        }
        Self { days }
    }

    /// Returns true if `date` is a listed trading day.
    pub fn contains(&self, date: Date) -> bool {
        self.days.binary_search(&date).is_ok()
    }

    /// First listed trading day.
    pub fn first(&self) -> Option<Date> {
        self.days.first().copied()
    }

    /// Last listed trading day.
    pub fn last(&self) -> Option<Date> {
        self.days.last().copied()
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns true if no trading day is listed.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Trading days in ascending order.
    pub fn days(&self) -> &[Date] {
        &self.days
    }

    /// Iterator over the trading days.
    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.days.iter().copied()
    }

    /// Walks back from `date` one calendar day at a time and returns the first
    /// listed trading day, looking at no more than `max_steps` earlier days.
    ///
    /// Returns `Ok(date)` when `date` itself is listed, `Ok(adjusted)` when a
    /// trading day is found within the bound, and `Err(steps)` with the number
    /// of days searched otherwise.
    pub fn on_or_before(&self, date: Date, max_steps: u32) -> Result<Date, u32> {
        let mut current = date;
        for step in 0..=max_steps {
            if self.contains(current) {
                return Ok(current);
            }
            if step < max_steps {
                current = current.add_days(-1);
            }
        }
        Err(max_steps)
    }

    /// Restricts the calendar to `[start, end]`.
    pub fn slice(&self, start: Date, end: Date) -> Self {
        let lo = self.days.partition_point(|d| *d < start);
        let hi = self.days.partition_point(|d| *d <= end);
        Self {
            days: self.days[lo..hi.max(lo)].to_vec(),
        }
    }
}

impl From<Vec<Date>> for TradingCalendar {
    fn from(dates: Vec<Date>) -> Self {
        Self::from_dates(dates)
    }
}

impl From<TradingCalendar> for Vec<Date> {
    fn from(calendar: TradingCalendar) -> Self {
        calendar.days
    }
}

impl FromIterator<Date> for TradingCalendar {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> Self {
        Self::from_dates(iter)
    }
}

impl Calendar for TradingCalendar {
    fn name(&self) -> &str {
        "Trading Days"
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.contains(date)
    }

    fn valid_days(&self, start: Date, end: Date) -> TradingCalendar {
        self.slice(start, end)
    }
}
