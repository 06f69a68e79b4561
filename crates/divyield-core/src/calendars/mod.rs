//! Trading-day calendars.
//!
//! This module provides:
//! - The [`Calendar`] trait answering "is this a trading day?"
//! - Rule-based holiday calendars and the built-in US market calendars
//! - Holiday lists loaded from JSON
//! - [`TradingCalendar`], the ordered set of trading days over a range

use chrono::Weekday;

mod holiday_list;
mod holidays;
mod markets;
mod trading;

pub use holiday_list::{CalendarData, HolidayListCalendar};
pub use holidays::{
    easter_sunday, observed_date, HolidayCalendar, HolidayCalendarBuilder, HolidayRule,
    WeekendType, MAX_YEAR, MIN_YEAR,
};
pub use markets::{nyse, sifma, Market};
pub use trading::TradingCalendar;

use crate::types::Date;

/// Trait for trading-day calendars.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the market trades on `date`.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday or weekend.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Ordered trading days between `start` and `end` inclusive.
    fn valid_days(&self, start: Date, end: Date) -> TradingCalendar {
        TradingCalendar::from_calendar(self, start, end)
    }
}

/// A weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
