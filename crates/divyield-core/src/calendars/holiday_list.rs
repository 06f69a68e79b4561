//! Holiday calendars loaded from JSON holiday lists.
//!
//! # Example
//!
//! ```
//! use divyield_core::calendars::{Calendar, HolidayListCalendar};
//! use divyield_core::types::Date;
//!
//! let cal = HolidayListCalendar::from_json(
//!     r#"{"name": "Vendor", "holidays": ["2020-04-10"]}"#,
//! )
//! .unwrap();
//! assert!(!cal.is_business_day(Date::from_ymd(2020, 4, 10).unwrap()));
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::holidays::{HolidayCalendar, WeekendType};
use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// JSON layout of a holiday list.
///
/// ```json
/// {
///   "name": "My Calendar",
///   "weekend": "SaturdaySunday",
///   "holidays": ["2025-01-01", "2025-12-25"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarData {
    /// Name of the calendar
    pub name: String,

    /// Weekend type (defaults to SaturdaySunday)
    #[serde(default)]
    pub weekend: Option<WeekendType>,

    /// Holiday dates in YYYY-MM-DD format
    #[serde(default)]
    pub holidays: Vec<String>,
}

/// Calendar whose holidays come from an external list.
#[derive(Debug, Clone)]
pub struct HolidayListCalendar {
    inner: HolidayCalendar,
}

impl HolidayListCalendar {
    /// Load a calendar from JSON text.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let data: CalendarData = serde_json::from_str(json)
            .map_err(|e| CoreError::calendar(format!("Failed to parse JSON: {e}")))?;
        Self::from_calendar_data(data)
    }

    /// Load a calendar from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::calendar(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Build a calendar from already parsed data.
    pub fn from_calendar_data(data: CalendarData) -> CoreResult<Self> {
        let holidays = data
            .holidays
            .iter()
            .map(|s| {
                Date::parse(s)
                    .map_err(|e| CoreError::calendar(format!("Invalid date '{s}': {e}")))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        log::debug!(
            "loaded {} holidays for calendar '{}'",
            holidays.len(),
            data.name
        );
        Ok(Self {
            inner: HolidayCalendar::from_dates(
                data.name,
                data.weekend.unwrap_or_default(),
                holidays,
            ),
        })
    }

    /// Number of listed holidays.
    pub fn holiday_count(&self) -> usize {
        self.inner.holiday_count()
    }
}

impl Calendar for HolidayListCalendar {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.inner.is_business_day(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "Test Calendar",
            "weekend": "SaturdaySunday",
            "holidays": ["2025-01-01", "2025-12-25"]
        }"#;
        let cal = HolidayListCalendar::from_json(json).unwrap();
        assert_eq!(cal.name(), "Test Calendar");
        assert_eq!(cal.holiday_count(), 2);
        assert!(!cal.is_business_day(Date::from_ymd(2025, 12, 25).unwrap()));
        assert!(cal.is_business_day(Date::from_ymd(2025, 12, 26).unwrap()));
    }

    #[test]
    fn test_from_json_minimal() {
        let cal = HolidayListCalendar::from_json(r#"{"name": "Bare"}"#).unwrap();
        assert_eq!(cal.holiday_count(), 0);
        assert!(!cal.is_business_day(Date::from_ymd(2025, 1, 4).unwrap()));
    }

    #[test]
    fn test_invalid_holiday() {
        let err = HolidayListCalendar::from_json(r#"{"name": "X", "holidays": ["2025-02-30"]}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::CalendarError { .. }));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "File", "holidays": ["2020-04-10"]}}"#).unwrap();
        let cal = HolidayListCalendar::from_json_file(file.path()).unwrap();
        assert!(!cal.is_business_day(Date::from_ymd(2020, 4, 10).unwrap()));
    }
}
