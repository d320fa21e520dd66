// 📅 Date Utilities
// ISO day strings, weekday keys and inclusive day ranges.
//
// Every date in the engine is a calendar day (NaiveDate). Weeks start on
// Sunday, matching the weekday keys used by custody templates and tasks.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Weekday keys in Sunday-first order
pub const WEEKDAY_KEYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Parse an ISO `yyyy-mm-dd` day
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ScheduleError::InvalidDate {
        value: value.to_string(),
    })
}

/// Lowercase weekday key for a date (`"sunday"`..`"saturday"`)
pub fn weekday_key(date: NaiveDate) -> &'static str {
    WEEKDAY_KEYS[date.weekday().num_days_from_sunday() as usize]
}

/// Parse a weekday key. Accepts the full English name in any case.
pub fn parse_weekday(key: &str) -> Result<Weekday> {
    let lower = key.trim().to_lowercase();
    match lower.as_str() {
        "sunday" => Ok(Weekday::Sun),
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        _ => Err(ScheduleError::InvalidWeekday {
            value: key.to_string(),
        }),
    }
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Whole weeks between the Sunday-weeks of `anchor` and `date`.
///
/// Uses floor division, so a date one week before the anchor is -1
/// (not 0, which truncation would give for partial weeks).
pub fn weeks_between(anchor: NaiveDate, date: NaiveDate) -> i64 {
    let days = (week_start(date) - week_start(anchor)).num_days();
    days.div_euclid(7)
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive day range `[from, to]`.
///
/// Deserialization goes through `DateRange::new`, so `from > to` is rejected.
/// A range assembled by hand may still be inverted; it then covers no days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = ScheduleError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.from, raw.to)
    }
}

impl DateRange {
    /// Build a range, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(ScheduleError::InvalidRange { from, to });
        }
        Ok(DateRange { from, to })
    }

    /// Build a range from two ISO day strings
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        DateRange::new(parse_date(from)?, parse_date(to)?)
    }

    /// Single-day range
    pub fn day(date: NaiveDate) -> Self {
        DateRange { from: date, to: date }
    }

    /// The Sunday..Saturday week containing `date`
    pub fn week_of(date: NaiveDate) -> Self {
        let from = week_start(date);
        DateRange {
            from,
            to: from + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// True when `[start, end]` shares at least one day with this range
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.to && end >= self.from
    }

    /// Number of days in the range (0 when inverted)
    pub fn len_days(&self) -> usize {
        let days = (self.to - self.from).num_days() + 1;
        days.max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// Every day from `from` to `to`, inclusive
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(d("2024-01-07"), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert!(matches!(
            parse_date("07/01/2024"),
            Err(ScheduleError::InvalidDate { .. })
        ));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_weekday_key() {
        assert_eq!(weekday_key(d("2024-01-07")), "sunday");
        assert_eq!(weekday_key(d("2024-01-01")), "monday");
        assert_eq!(weekday_key(d("2024-01-13")), "saturday");
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("Saturday").unwrap(), Weekday::Sat);
        assert!(matches!(
            parse_weekday("funday"),
            Err(ScheduleError::InvalidWeekday { .. })
        ));
    }

    #[test]
    fn test_week_start() {
        assert_eq!(week_start(d("2024-01-07")), d("2024-01-07"));
        assert_eq!(week_start(d("2024-01-10")), d("2024-01-07"));
        assert_eq!(week_start(d("2024-01-13")), d("2024-01-07"));
    }

    #[test]
    fn test_weeks_between_floors_before_anchor() {
        let anchor = d("2024-01-10"); // Wednesday
        assert_eq!(weeks_between(anchor, d("2024-01-07")), 0);
        assert_eq!(weeks_between(anchor, d("2024-01-06")), -1);
        assert_eq!(weeks_between(anchor, d("2023-12-31")), -1);
        assert_eq!(weeks_between(anchor, d("2023-12-30")), -2);
        assert_eq!(weeks_between(anchor, d("2024-01-14")), 1);
    }

    #[test]
    fn test_range_rejects_inverted() {
        assert!(matches!(
            DateRange::parse("2024-01-10", "2024-01-01"),
            Err(ScheduleError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_range_deserialize_validates() {
        let range: DateRange =
            serde_json::from_str(r#"{"from":"2024-01-01","to":"2024-01-10"}"#).unwrap();
        assert_eq!(range.len_days(), 10);

        let err = serde_json::from_str::<DateRange>(r#"{"from":"2024-01-10","to":"2024-01-01"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("is after"));
    }

    #[test]
    fn test_inverted_range_covers_no_days() {
        let range = DateRange { from: d("2024-01-10"), to: d("2024-01-01") };
        assert!(range.is_empty());
        assert_eq!(range.len_days(), 0);
        assert_eq!(range.days().count(), 0);
    }

    #[test]
    fn test_range_days_inclusive() {
        let range = DateRange::parse("2024-01-30", "2024-02-02").unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(range.len_days(), 4);
        assert_eq!(days[0], d("2024-01-30"));
        assert_eq!(days[3], d("2024-02-02"));
    }

    #[test]
    fn test_range_overlaps() {
        let range = DateRange::parse("2024-01-10", "2024-01-20").unwrap();
        assert!(range.overlaps(d("2024-01-05"), d("2024-01-10")));
        assert!(range.overlaps(d("2024-01-20"), d("2024-01-25")));
        assert!(!range.overlaps(d("2024-01-01"), d("2024-01-09")));
        assert!(!range.overlaps(d("2024-01-21"), d("2024-01-21")));
    }

    #[test]
    fn test_week_of() {
        let week = DateRange::week_of(d("2024-01-10"));
        assert_eq!(week.from, d("2024-01-07"));
        assert_eq!(week.to, d("2024-01-13"));
    }
}
