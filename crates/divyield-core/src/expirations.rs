//! Canonical option expiration dates.
//!
//! Index options expire on a rule date of the contract month, by default the
//! third Friday. When that day is not a trading day (Good Friday, Juneteenth)
//! the market expiration is the last trading day before it. The generator
//! enumerates rule dates in a range, keeps the requested contract months, and
//! moves each non-trading date back onto the trading calendar, searching at
//! most a bounded number of days.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendars::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Quarterly contract months (March, June, September, December).
pub const QUARTERLY_MONTHS: [u32; 4] = [3, 6, 9, 12];

/// Default bound on the backward holiday search, in calendar days.
pub const DEFAULT_MAX_ADJUSTMENT_DAYS: u32 = 10;

/// Rule selecting one day in each month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayRule {
    /// The `n`th occurrence of `weekday`, counting from the 1st of the month.
    NthWeekday {
        /// Weekday to match.
        weekday: Weekday,
        /// Occurrence, 1 to 5.
        n: u32,
    },
    /// The last occurrence of a weekday in the month.
    LastWeekday(Weekday),
}

impl DayRule {
    /// Third Friday of the month, the standard index option expiration.
    pub const THIRD_FRIDAY: DayRule = DayRule::NthWeekday {
        weekday: Weekday::Fri,
        n: 3,
    };

    /// Date selected by the rule in the given month, if the month has one.
    pub fn date_in(&self, year: i32, month: u32) -> Option<Date> {
        match *self {
            DayRule::NthWeekday { weekday, n } => Date::nth_weekday_of_month(year, month, weekday, n),
            DayRule::LastWeekday(weekday) => Date::last_weekday_of_month(year, month, weekday),
        }
    }
}

impl Default for DayRule {
    fn default() -> Self {
        Self::THIRD_FRIDAY
    }
}

impl fmt::Display for DayRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayRule::NthWeekday { weekday, n } => {
                write!(f, "WOM-{n}{}", weekday_code(*weekday))
            }
            DayRule::LastWeekday(weekday) => write!(f, "LAST-{}", weekday_code(*weekday)),
        }
    }
}

impl FromStr for DayRule {
    type Err = CoreError;

    /// Parses `WOM-<n><DAY>` (e.g. `WOM-3FRI`) or `LAST-<DAY>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        if let Some(rest) = upper.strip_prefix("WOM-") {
            let (digits, day) = rest.split_at(rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(0));
            let n: u32 = digits
                .parse()
                .map_err(|_| CoreError::invalid_day_rule(format!("missing occurrence in '{s}'")))?;
            if !(1..=5).contains(&n) {
                return Err(CoreError::invalid_day_rule(format!(
                    "occurrence {n} out of range 1-5 in '{s}'"
                )));
            }
            return Ok(DayRule::NthWeekday {
                weekday: parse_weekday(day, s)?,
                n,
            });
        }
        if let Some(day) = upper.strip_prefix("LAST-") {
            return Ok(DayRule::LastWeekday(parse_weekday(day, s)?));
        }
        Err(CoreError::invalid_day_rule(format!(
            "expected WOM-<n><DAY> or LAST-<DAY>, got '{s}'"
        )))
    }
}

impl TryFrom<String> for DayRule {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayRule> for String {
    fn from(rule: DayRule) -> Self {
        rule.to_string()
    }
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

fn parse_weekday(code: &str, original: &str) -> CoreResult<Weekday> {
    match code {
        "MON" => Ok(Weekday::Mon),
        "TUE" => Ok(Weekday::Tue),
        "WED" => Ok(Weekday::Wed),
        "THU" => Ok(Weekday::Thu),
        "FRI" => Ok(Weekday::Fri),
        "SAT" => Ok(Weekday::Sat),
        "SUN" => Ok(Weekday::Sun),
        _ => Err(CoreError::invalid_day_rule(format!(
            "unknown weekday '{code}' in '{original}'"
        ))),
    }
}

/// A contract month's expiration before and after trading-day adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalExpiration {
    /// Contract year.
    pub contract_year: i32,
    /// Contract month (1-12).
    pub contract_month: u32,
    /// Date selected by the day rule.
    pub nominal: Date,
    /// Last trading day on or before `nominal`.
    pub date: Date,
}

impl CanonicalExpiration {
    /// Returns true if the nominal date was not a trading day.
    pub fn is_adjusted(&self) -> bool {
        self.nominal != self.date
    }

    /// Calendar days the expiration was moved back.
    pub fn adjustment_days(&self) -> i64 {
        self.date.days_between(&self.nominal)
    }
}

/// Produces canonical expiration dates against a trading calendar.
#[derive(Clone, Copy)]
pub struct ExpirationGenerator<'a> {
    calendar: &'a dyn Calendar,
    day_rule: DayRule,
    max_adjustment_days: u32,
}

impl fmt::Debug for ExpirationGenerator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpirationGenerator")
            .field("calendar", &self.calendar.name())
            .field("day_rule", &self.day_rule)
            .field("max_adjustment_days", &self.max_adjustment_days)
            .finish()
    }
}

impl<'a> ExpirationGenerator<'a> {
    /// Creates a generator using the third-Friday rule and the default bound.
    pub fn new(calendar: &'a dyn Calendar) -> Self {
        Self {
            calendar,
            day_rule: DayRule::default(),
            max_adjustment_days: DEFAULT_MAX_ADJUSTMENT_DAYS,
        }
    }

    /// Sets the day selection rule.
    pub fn with_day_rule(mut self, day_rule: DayRule) -> Self {
        self.day_rule = day_rule;
        self
    }

    /// Sets the maximum number of days an expiration may move back.
    pub fn with_max_adjustment_days(mut self, days: u32) -> Self {
        self.max_adjustment_days = days;
        self
    }

    /// Returns the trading calendar.
    pub fn calendar(&self) -> &'a dyn Calendar {
        self.calendar
    }

    /// Returns the day selection rule.
    pub fn day_rule(&self) -> DayRule {
        self.day_rule
    }

    /// Returns the adjustment bound in calendar days.
    pub fn max_adjustment_days(&self) -> u32 {
        self.max_adjustment_days
    }

    /// Canonical expiration dates for `target_months` between `start` and
    /// `end` inclusive, ascending and deduplicated.
    ///
    /// # Errors
    ///
    /// - `InvalidDateRange` if `start > end`
    /// - `InvalidMonth` for a month outside 1..=12
    /// - `EmptyRange` if no rule date in range falls in a target month
    /// - `CalendarGap` if a rule date cannot be moved onto a trading day
    pub fn generate(&self, start: Date, end: Date, target_months: &[u32]) -> CoreResult<Vec<Date>> {
        Ok(self
            .generate_detailed(start, end, target_months)?
            .into_iter()
            .map(|e| e.date)
            .collect())
    }

    /// Like [`generate`](Self::generate), keeping the nominal date and contract
    /// month of each expiration.
    pub fn generate_detailed(
        &self,
        start: Date,
        end: Date,
        target_months: &[u32],
    ) -> CoreResult<Vec<CanonicalExpiration>> {
        if start > end {
            return Err(CoreError::InvalidDateRange { start, end });
        }
        let mut wanted = [false; 13];
        for &month in target_months {
            if !(1..=12).contains(&month) {
                return Err(CoreError::InvalidMonth(month));
            }
            wanted[month as usize] = true;
        }

        let nominals: Vec<Date> = self
            .rule_dates(start, end)
            .into_iter()
            .filter(|d| wanted[d.month() as usize])
            .collect();
        if nominals.is_empty() {
            return Err(CoreError::EmptyRange { start, end });
        }

        // Reach back far enough that an in-range rule date can still land on
        // a trading day before `start`.
        let trading_days = self
            .calendar
            .valid_days(start.add_days(-i64::from(self.max_adjustment_days)), end);

        let mut expirations = Vec::with_capacity(nominals.len());
        for nominal in nominals {
            let date = trading_days
                .on_or_before(nominal, self.max_adjustment_days)
                .map_err(|attempts| CoreError::CalendarGap { nominal, attempts })?;
            if date != nominal {
                log::info!(
                    "{nominal} is not a trading day on {}; expiration moved back to {date}",
                    self.calendar.name()
                );
            }
            expirations.push(CanonicalExpiration {
                contract_year: nominal.year(),
                contract_month: nominal.month(),
                nominal,
                date,
            });
        }

        expirations.sort_by_key(|e| e.date);
        expirations.dedup_by_key(|e| e.date);
        Ok(expirations)
    }

    /// Every rule date between `start` and `end`, one per month at most.
    pub fn rule_dates(&self, start: Date, end: Date) -> Vec<Date> {
        let mut dates = Vec::new();
        let mut month = start.first_of_month();
        while month <= end {
            if let Some(date) = self.day_rule.date_in(month.year(), month.month()) {
                if date >= start && date <= end {
                    dates.push(date);
                }
            }
            match month.first_of_next_month() {
                Some(next) => month = next,
                None => break,
            }
        }
        dates
    }
}

/// Canonical expiration dates for `target_months` in `[start_date, end_date]`.
///
/// Convenience wrapper around [`ExpirationGenerator`] with the default
/// adjustment bound.
///
/// # Example
///
/// ```
/// use divyield_core::calendars::Market;
/// use divyield_core::expirations::{generate_canonical_expirations, DayRule, QUARTERLY_MONTHS};
/// use divyield_core::types::Date;
///
/// let dates = generate_canonical_expirations(
///     Market::UsFinancialMarkets.calendar(),
///     Date::from_ymd(2020, 1, 1).unwrap(),
///     Date::from_ymd(2020, 12, 31).unwrap(),
///     &QUARTERLY_MONTHS,
///     DayRule::THIRD_FRIDAY,
/// )
/// .unwrap();
/// assert_eq!(dates[0], Date::from_ymd(2020, 3, 20).unwrap());
/// ```
pub fn generate_canonical_expirations(
    calendar: &dyn Calendar,
    start_date: Date,
    end_date: Date,
    target_months: &[u32],
    day_rule: DayRule,
) -> CoreResult<Vec<Date>> {
    ExpirationGenerator::new(calendar)
        .with_day_rule(day_rule)
        .generate(start_date, end_date, target_months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::{sifma, TradingCalendar, WeekendCalendar};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_quarterly_2020() {
        let dates = ExpirationGenerator::new(sifma())
            .generate(d(2020, 1, 1), d(2020, 12, 31), &QUARTERLY_MONTHS)
            .unwrap();
        assert_eq!(
            dates,
            vec![d(2020, 3, 20), d(2020, 6, 19), d(2020, 9, 18), d(2020, 12, 18)]
        );
    }

    #[test]
    fn test_good_friday_2008() {
        let detailed = ExpirationGenerator::new(sifma())
            .generate_detailed(d(2008, 1, 1), d(2008, 6, 30), &QUARTERLY_MONTHS)
            .unwrap();
        assert_eq!(detailed.len(), 2);
        assert_eq!(detailed[0].nominal, d(2008, 3, 21));
        assert_eq!(detailed[0].date, d(2008, 3, 20));
        assert!(detailed[0].is_adjusted());
        assert_eq!(detailed[0].adjustment_days(), 1);
        assert!(!detailed[1].is_adjusted());
    }

    #[test]
    fn test_juneteenth_2026() {
        let dates = ExpirationGenerator::new(sifma())
            .generate(d(2026, 6, 1), d(2026, 6, 30), &[6])
            .unwrap();
        assert_eq!(dates, vec![d(2026, 6, 18)]);
    }

    #[test]
    fn test_all_months() {
        let months: Vec<u32> = (1..=12).collect();
        let dates = ExpirationGenerator::new(&WeekendCalendar)
            .generate(d(2020, 1, 1), d(2020, 12, 31), &months)
            .unwrap();
        assert_eq!(dates.len(), 12);
        assert_eq!(dates[0], d(2020, 1, 17));
    }

    #[test]
    fn test_range_excludes_rule_dates_outside() {
        // Starts the day after the March third Friday.
        let dates = ExpirationGenerator::new(&WeekendCalendar)
            .generate(d(2020, 3, 21), d(2020, 9, 18), &QUARTERLY_MONTHS)
            .unwrap();
        assert_eq!(dates, vec![d(2020, 6, 19), d(2020, 9, 18)]);
    }

    #[test]
    fn test_rule_dates_stop_at_last_date() {
        let gen = ExpirationGenerator::new(&WeekendCalendar);
        let start = Date::MAX.first_of_month().add_days(-40);
        let dates = gen.rule_dates(start, Date::MAX);
        assert!(!dates.is_empty() && dates.len() <= 2);
        assert!(dates.iter().all(|d| d.weekday() == Weekday::Fri));
    }

    #[test]
    fn test_empty_range() {
        let err = ExpirationGenerator::new(sifma())
            .generate(d(2020, 1, 1), d(2020, 2, 28), &QUARTERLY_MONTHS)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::EmptyRange {
                start: d(2020, 1, 1),
                end: d(2020, 2, 28)
            }
        );

        let err = ExpirationGenerator::new(sifma())
            .generate(d(2020, 1, 1), d(2020, 12, 31), &[])
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptyRange { .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let gen = ExpirationGenerator::new(sifma());
        assert_eq!(
            gen.generate(d(2020, 12, 31), d(2020, 1, 1), &QUARTERLY_MONTHS),
            Err(CoreError::InvalidDateRange {
                start: d(2020, 12, 31),
                end: d(2020, 1, 1)
            })
        );
        assert_eq!(
            gen.generate(d(2020, 1, 1), d(2020, 12, 31), &[3, 13]),
            Err(CoreError::InvalidMonth(13))
        );
    }

    #[test]
    fn test_calendar_gap() {
        // Synthetic calendar with nothing around the March 2020 expiration.
        let cal = TradingCalendar::from_dates([d(2020, 3, 2), d(2020, 6, 19)]);
        let err = ExpirationGenerator::new(&cal)
            .generate(d(2020, 3, 1), d(2020, 6, 30), &QUARTERLY_MONTHS)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::CalendarGap {
                nominal: d(2020, 3, 20),
                attempts: DEFAULT_MAX_ADJUSTMENT_DAYS
            }
        );
    }

    #[test]
    fn test_bound_controls_search() {
        let cal = TradingCalendar::from_dates([d(2020, 3, 16), d(2020, 6, 19)]);
        let gen = ExpirationGenerator::new(&cal).with_max_adjustment_days(3);
        assert!(matches!(
            gen.generate(d(2020, 3, 1), d(2020, 6, 30), &QUARTERLY_MONTHS),
            Err(CoreError::CalendarGap { attempts: 3, .. })
        ));

        let dates = gen
            .with_max_adjustment_days(4)
            .generate(d(2020, 3, 1), d(2020, 6, 30), &QUARTERLY_MONTHS)
            .unwrap();
        assert_eq!(dates, vec![d(2020, 3, 16), d(2020, 6, 19)]);
    }

    #[test]
    fn test_adjustment_reaches_before_range_start() {
        // Good Friday 2008 is the first day of the range.
        let dates = ExpirationGenerator::new(sifma())
            .generate(d(2008, 3, 21), d(2008, 3, 31), &[3])
            .unwrap();
        assert_eq!(dates, vec![d(2008, 3, 20)]);
    }

    #[test]
    fn test_day_rule_parse_and_display() {
        assert_eq!("WOM-3FRI".parse::<DayRule>().unwrap(), DayRule::THIRD_FRIDAY);
        assert_eq!(
            "wom-1mon".parse::<DayRule>().unwrap(),
            DayRule::NthWeekday {
                weekday: Weekday::Mon,
                n: 1
            }
        );
        assert_eq!(
            "LAST-THU".parse::<DayRule>().unwrap(),
            DayRule::LastWeekday(Weekday::Thu)
        );
        assert_eq!(DayRule::THIRD_FRIDAY.to_string(), "WOM-3FRI");
        assert_eq!(DayRule::LastWeekday(Weekday::Thu).to_string(), "LAST-THU");
        assert!("WOM-6FRI".parse::<DayRule>().is_err());
        assert!("WOM-FRI".parse::<DayRule>().is_err());
        assert!("WOM-3FRX".parse::<DayRule>().is_err());
        assert!("3FRI".parse::<DayRule>().is_err());
    }

    #[test]
    fn test_free_function_with_last_weekday_rule() {
        let dates = generate_canonical_expirations(
            &WeekendCalendar,
            d(2020, 1, 1),
            d(2020, 6, 30),
            &QUARTERLY_MONTHS,
            DayRule::LastWeekday(Weekday::Fri),
        )
        .unwrap();
        assert_eq!(dates, vec![d(2020, 3, 27), d(2020, 6, 26)]);
    }
}
