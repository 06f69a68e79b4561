//! Built-in US market calendars.
//!
//! - [`Market::UsFinancialMarkets`]: SIFMA recommended closes for the US
//!   bond and financial markets ("Financial_Markets_US"). This is the calendar
//!   used to place index option expirations.
//! - [`Market::Nyse`]: New York Stock Exchange closes, including unscheduled
//!   closures.
//! - [`Market::WeekendOnly`]: weekends only, for tests and ad hoc runs.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::holidays::{HolidayCalendar, HolidayCalendarBuilder, WeekendType};
use super::{Calendar, WeekendCalendar};
use crate::error::CoreError;
use crate::types::Date;

static SIFMA_CALENDAR: OnceLock<HolidayCalendar> = OnceLock::new();
static NYSE_CALENDAR: OnceLock<HolidayCalendar> = OnceLock::new();
static WEEKEND_CALENDAR: WeekendCalendar = WeekendCalendar;

/// Market identifier selecting a trading calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    /// SIFMA US financial markets calendar.
    #[default]
    UsFinancialMarkets,
    /// NYSE equity calendar.
    Nyse,
    /// Weekends only.
    WeekendOnly,
}

impl Market {
    /// Returns the process-wide calendar for this market.
    pub fn calendar(self) -> &'static dyn Calendar {
        match self {
            Market::UsFinancialMarkets => sifma(),
            Market::Nyse => nyse(),
            Market::WeekendOnly => &WEEKEND_CALENDAR,
        }
    }

    /// Stable identifier used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Market::UsFinancialMarkets => "us_financial_markets",
            Market::Nyse => "nyse",
            Market::WeekendOnly => "weekend_only",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sifma" | "sifma_us" | "financial_markets_us" | "us_financial_markets" | "us" => {
                Ok(Market::UsFinancialMarkets)
            }
            "nyse" | "xnys" => Ok(Market::Nyse),
            "weekend" | "weekend_only" | "weekends" => Ok(Market::WeekendOnly),
            other => Err(CoreError::calendar(format!("unknown market '{other}'"))),
        }
    }
}

/// SIFMA US financial markets calendar.
///
/// ## Holidays
///
/// - New Year's Day (January 1, observed)
/// - Martin Luther King Jr. Day (3rd Monday in January)
/// - Presidents' Day (3rd Monday in February)
/// - Good Friday
/// - Memorial Day (last Monday in May)
/// - Juneteenth (June 19, observed) - since 2022
/// - Independence Day (July 4, observed)
/// - Labor Day (1st Monday in September)
/// - Columbus Day (2nd Monday in October)
/// - Veterans Day (November 11, observed)
/// - Thanksgiving Day (4th Thursday in November)
/// - Christmas Day (December 25, observed)
///
/// Early closes are not modelled.
pub fn sifma() -> &'static HolidayCalendar {
    SIFMA_CALENDAR.get_or_init(|| {
        HolidayCalendarBuilder::new("SIFMA US Financial Markets")
            .weekend(WeekendType::SaturdaySunday)
            .fixed_observed(1, 1)
            .nth_weekday(1, Weekday::Mon, 3)
            .nth_weekday(2, Weekday::Mon, 3)
            .easter_offset(-2)
            .last_weekday(5, Weekday::Mon)
            .fixed_observed_from(6, 19, 2022)
            .fixed_observed(7, 4)
            .nth_weekday(9, Weekday::Mon, 1)
            .nth_weekday(10, Weekday::Mon, 2)
            .fixed_observed(11, 11)
            .nth_weekday(11, Weekday::Thu, 4)
            .fixed_observed(12, 25)
            .dates(special_closures())
            .build()
    })
}

/// NYSE equity calendar.
///
/// Same as SIFMA without Columbus Day and Veterans Day.
pub fn nyse() -> &'static HolidayCalendar {
    NYSE_CALENDAR.get_or_init(|| {
        HolidayCalendarBuilder::new("NYSE")
            .weekend(WeekendType::SaturdaySunday)
            .fixed_observed(1, 1)
            .nth_weekday(1, Weekday::Mon, 3)
            .nth_weekday(2, Weekday::Mon, 3)
            .easter_offset(-2)
            .last_weekday(5, Weekday::Mon)
            .fixed_observed_from(6, 19, 2022)
            .fixed_observed(7, 4)
            .nth_weekday(9, Weekday::Mon, 1)
            .nth_weekday(11, Weekday::Thu, 4)
            .fixed_observed(12, 25)
            .dates(special_closures())
            .build()
    })
}

/// Unscheduled market-wide closures.
fn special_closures() -> Vec<Date> {
    [
        // September 11 attacks
        (2001, 9, 11),
        (2001, 9, 12),
        (2001, 9, 13),
        (2001, 9, 14),
        // National days of mourning
        (2004, 6, 11),
        (2007, 1, 2),
        (2018, 12, 5),
        (2025, 1, 9),
        // Hurricane Sandy
        (2012, 10, 29),
        (2012, 10, 30),
    ]
    .into_iter()
    .filter_map(|(y, m, d)| Date::from_ymd(y, m, d).ok())
    .collect()
}
