//! Rule-based holiday calendars.
//!
//! Holidays are generated once, at build time, for a bounded year range and
//! stored in a hash set; lookups are O(1).

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::Calendar;
use crate::types::Date;

/// Minimum year generated by rule-based calendars.
pub const MIN_YEAR: i32 = 1970;
/// Maximum year generated by rule-based calendars.
pub const MAX_YEAR: i32 = 2100;

/// Weekend definition for a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeekendType {
    /// Saturday and Sunday (US markets)
    #[default]
    SaturdaySunday,
    /// Friday and Saturday
    FridaySaturday,
    /// Sunday only
    SundayOnly,
    /// No weekends
    None,
}

impl WeekendType {
    /// Check if a weekday is a weekend day for this type.
    #[inline]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        match self {
            WeekendType::SaturdaySunday => matches!(weekday, Weekday::Sat | Weekday::Sun),
            WeekendType::FridaySaturday => matches!(weekday, Weekday::Fri | Weekday::Sat),
            WeekendType::SundayOnly => weekday == Weekday::Sun,
            WeekendType::None => false,
        }
    }
}

/// A rule producing at most one holiday per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRule {
    /// Same month/day every year starting at `from_year`.
    ///
    /// With `observed`, a Saturday holiday moves to Friday and a Sunday holiday
    /// to Monday, unless the move would leave the calendar year.
    Fixed {
        /// Month (1-12).
        month: u32,
        /// Day of month.
        day: u32,
        /// First year the holiday applies.
        from_year: i32,
        /// Apply weekend observance.
        observed: bool,
    },
    /// The `n`th given weekday of a month.
    NthWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday.
        weekday: Weekday,
        /// Occurrence (1-based).
        n: u32,
    },
    /// The last given weekday of a month.
    LastWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday.
        weekday: Weekday,
    },
    /// Offset in days from Easter Sunday (-2 is Good Friday).
    Easter {
        /// Offset in calendar days.
        offset: i64,
    },
}

impl HolidayRule {
    /// Returns the holiday this rule produces in `year`, if any.
    pub fn date_in(&self, year: i32) -> Option<Date> {
        match *self {
            HolidayRule::Fixed {
                month,
                day,
                from_year,
                observed,
            } => {
                if year < from_year {
                    return None;
                }
                let date = Date::from_ymd(year, month, day).ok()?;
                if !observed {
                    return Some(date);
                }
                let shifted = observed_date(date);
                Some(if shifted.year() == year { shifted } else { date })
            }
            HolidayRule::NthWeekday { month, weekday, n } => {
                Date::nth_weekday_of_month(year, month, weekday, n)
            }
            HolidayRule::LastWeekday { month, weekday } => {
                Date::last_weekday_of_month(year, month, weekday)
            }
            HolidayRule::Easter { offset } => easter_sunday(year).map(|e| e.add_days(offset)),
        }
    }
}

/// Holiday calendar generated from a list of rules plus explicit dates.
#[derive(Clone)]
pub struct HolidayCalendar {
    name: String,
    weekend: WeekendType,
    holidays: HashSet<Date>,
}

impl std::fmt::Debug for HolidayCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayCalendar")
            .field("name", &self.name)
            .field("weekend", &self.weekend)
            .field("holiday_count", &self.holidays.len())
            .finish()
    }
}

impl HolidayCalendar {
    /// Creates a calendar from explicit holiday dates.
    pub fn from_dates(
        name: impl Into<String>,
        weekend: WeekendType,
        holidays: impl IntoIterator<Item = Date>,
    ) -> Self {
        Self {
            name: name.into(),
            weekend,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Returns the weekend type.
    pub fn weekend_type(&self) -> WeekendType {
        self.weekend
    }

    /// Returns true if the date is a listed holiday (weekends excluded).
    pub fn is_listed_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }

    /// Returns the listed holidays between `start` and `end`, sorted.
    pub fn holidays_between(&self, start: Date, end: Date) -> Vec<Date> {
        let mut out: Vec<Date> = self
            .holidays
            .iter()
            .copied()
            .filter(|d| *d >= start && *d <= end)
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of listed holidays.
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.weekend.is_weekend(date.weekday()) && !self.holidays.contains(&date)
    }
}

/// Builder for [`HolidayCalendar`].
pub struct HolidayCalendarBuilder {
    name: String,
    weekend: WeekendType,
    start_year: i32,
    end_year: i32,
    rules: Vec<HolidayRule>,
    extra: Vec<Date>,
}

impl HolidayCalendarBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weekend: WeekendType::SaturdaySunday,
            start_year: MIN_YEAR,
            end_year: MAX_YEAR,
            rules: Vec::new(),
            extra: Vec::new(),
        }
    }

    /// Set the weekend type.
    pub fn weekend(mut self, weekend: WeekendType) -> Self {
        self.weekend = weekend;
        self
    }

    /// Set the year range for generating holidays.
    pub fn year_range(mut self, start: i32, end: i32) -> Self {
        self.start_year = start.max(MIN_YEAR);
        self.end_year = end.min(MAX_YEAR);
        self
    }

    /// Add a rule.
    pub fn rule(mut self, rule: HolidayRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a fixed, weekend-observed holiday.
    pub fn fixed_observed(self, month: u32, day: u32) -> Self {
        self.fixed_observed_from(month, day, MIN_YEAR)
    }

    /// Add a fixed, weekend-observed holiday starting in `from_year`.
    pub fn fixed_observed_from(self, month: u32, day: u32, from_year: i32) -> Self {
        self.rule(HolidayRule::Fixed {
            month,
            day,
            from_year,
            observed: true,
        })
    }

    /// Add an nth-weekday holiday.
    pub fn nth_weekday(self, month: u32, weekday: Weekday, n: u32) -> Self {
        self.rule(HolidayRule::NthWeekday { month, weekday, n })
    }

    /// Add a last-weekday holiday.
    pub fn last_weekday(self, month: u32, weekday: Weekday) -> Self {
        self.rule(HolidayRule::LastWeekday { month, weekday })
    }

    /// Add an Easter-relative holiday.
    pub fn easter_offset(self, offset: i64) -> Self {
        self.rule(HolidayRule::Easter { offset })
    }

    /// Add one-off closures.
    pub fn dates(mut self, dates: impl IntoIterator<Item = Date>) -> Self {
        self.extra.extend(dates);
        self
    }

    /// Build the calendar.
    pub fn build(self) -> HolidayCalendar {
        let mut holidays: HashSet<Date> = self.extra.into_iter().collect();
        for year in self.start_year..=self.end_year {
            holidays.extend(self.rules.iter().filter_map(|rule| rule.date_in(year)));
        }
        HolidayCalendar {
            name: self.name,
            weekend: self.weekend,
            holidays,
        }
    }
}

/// Saturday holidays are observed on Friday, Sunday holidays on Monday.
pub fn observed_date(date: Date) -> Date {
    match date.weekday() {
        Weekday::Sat => date.add_days(-1),
        Weekday::Sun => date.add_days(1),
        _ => date,
    }
}

/// Easter Sunday (Anonymous Gregorian algorithm).
#[allow(clippy::many_single_char_names)]
pub fn easter_sunday(year: i32) -> Option<Date> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;

    Date::from_ymd(year, month as u32, day as u32).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_easter() {
        assert_eq!(easter_sunday(2025), Some(d(2025, 4, 20)));
        assert_eq!(easter_sunday(2024), Some(d(2024, 3, 31)));
        assert_eq!(easter_sunday(2008), Some(d(2008, 3, 23)));
    }

    #[test]
    fn test_observed_date() {
        // July 4, 2026 is a Saturday
        assert_eq!(observed_date(d(2026, 7, 4)), d(2026, 7, 3));
        // July 4, 2021 is a Sunday
        assert_eq!(observed_date(d(2021, 7, 4)), d(2021, 7, 5));
        assert_eq!(observed_date(d(2025, 7, 4)), d(2025, 7, 4));
    }

    #[test]
    fn test_fixed_rule_stays_in_year() {
        // Jan 1, 2022 is a Saturday; the observed Friday would fall in 2021.
        let rule = HolidayRule::Fixed {
            month: 1,
            day: 1,
            from_year: MIN_YEAR,
            observed: true,
        };
        assert_eq!(rule.date_in(2022), Some(d(2022, 1, 1)));
        assert_eq!(rule.date_in(2023), Some(d(2023, 1, 2)));
    }

    #[test]
    fn test_fixed_rule_from_year() {
        let juneteenth = HolidayRule::Fixed {
            month: 6,
            day: 19,
            from_year: 2022,
            observed: true,
        };
        assert_eq!(juneteenth.date_in(2021), None);
        assert_eq!(juneteenth.date_in(2022), Some(d(2022, 6, 20)));
    }

    #[test]
    fn test_weekend_check() {
        assert!(WeekendType::SaturdaySunday.is_weekend(Weekday::Sat));
        assert!(!WeekendType::SaturdaySunday.is_weekend(Weekday::Fri));
        assert!(WeekendType::FridaySaturday.is_weekend(Weekday::Fri));
        assert!(!WeekendType::None.is_weekend(Weekday::Sun));
    }

    #[test]
    fn test_builder() {
        let cal = HolidayCalendarBuilder::new("Test")
            .year_range(2025, 2025)
            .fixed_observed(1, 1)
            .nth_weekday(1, Weekday::Mon, 3)
            .easter_offset(-2)
            .dates([d(2025, 1, 9)])
            .build();

        assert_eq!(cal.name(), "Test");
        assert_eq!(cal.holiday_count(), 4);
        assert!(!cal.is_business_day(d(2025, 1, 1)));
        assert!(!cal.is_business_day(d(2025, 1, 9)));
        assert!(!cal.is_business_day(d(2025, 1, 20)));
        assert!(!cal.is_business_day(d(2025, 4, 18)));
        assert!(cal.is_business_day(d(2025, 1, 2)));
        assert_eq!(
            cal.holidays_between(d(2025, 1, 1), d(2025, 1, 31)),
            vec![d(2025, 1, 1), d(2025, 1, 9), d(2025, 1, 20)]
        );
    }
}
