// 🔁 Recurrence Expander - Weekly single-weekday occurrences
//
// First matching weekday on/after `from`, then every 7 days while <= `to`.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use crate::dates::parse_weekday;
use crate::error::Result;

/// Lazy, finite iterator over weekly occurrences inside `[from, to]`.
///
/// Cloning restarts from the clone point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyOccurrences {
    next: Option<NaiveDate>,
    to: NaiveDate,
}

impl WeeklyOccurrences {
    /// Occurrences of `weekday` between `from` and `to` inclusive
    pub fn new(from: NaiveDate, to: NaiveDate, weekday: Weekday) -> Self {
        let offset = (7 + weekday.num_days_from_sunday() as i64
            - from.weekday().num_days_from_sunday() as i64)
            % 7;
        let first = from.checked_add_signed(Duration::days(offset));

        WeeklyOccurrences {
            next: first.filter(|d| *d <= to),
            to,
        }
    }

    fn empty(to: NaiveDate) -> Self {
        WeeklyOccurrences { next: None, to }
    }
}

impl Iterator for WeeklyOccurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current
            .checked_add_signed(Duration::days(7))
            .filter(|d| *d <= self.to);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(current) => {
                let remaining = ((self.to - current).num_days() / 7 + 1) as usize;
                (remaining, Some(remaining))
            }
            None => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for WeeklyOccurrences {}

impl std::iter::FusedIterator for WeeklyOccurrences {}

/// Weekly occurrences for a weekday key.
///
/// An unrecognized key or an inverted range yields nothing.
pub fn expand_weekly(from: NaiveDate, to: NaiveDate, day_of_week: &str) -> WeeklyOccurrences {
    match parse_weekday(day_of_week) {
        Ok(weekday) if from <= to => WeeklyOccurrences::new(from, to, weekday),
        Ok(_) => WeeklyOccurrences::empty(to),
        Err(_) => {
            debug!(day_of_week, "unrecognized weekday key, no occurrences");
            WeeklyOccurrences::empty(to)
        }
    }
}

/// Like `expand_weekly`, but an unrecognized weekday key is an error
pub fn try_expand_weekly(from: NaiveDate, to: NaiveDate, day_of_week: &str) -> Result<WeeklyOccurrences> {
    let weekday = parse_weekday(day_of_week)?;
    Ok(WeeklyOccurrences::new(from, to, weekday))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{parse_date, weekday_key};
    use crate::error::ScheduleError;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_scenario_c_mondays() {
        let dates: Vec<_> = expand_weekly(d("2024-01-01"), d("2024-01-22"), "monday").collect();

        assert_eq!(
            dates,
            vec![d("2024-01-01"), d("2024-01-08"), d("2024-01-15"), d("2024-01-22")]
        );
    }

    #[test]
    fn test_first_occurrence_after_from() {
        // 2024-01-03 is a Wednesday; first Monday is 2024-01-08
        let dates: Vec<_> = expand_weekly(d("2024-01-03"), d("2024-01-20"), "monday").collect();
        assert_eq!(dates, vec![d("2024-01-08"), d("2024-01-15")]);
    }

    #[test]
    fn test_bounds_and_ordering_for_every_weekday() {
        let from = d("2024-02-14");
        let to = d("2024-04-02");

        for key in crate::dates::WEEKDAY_KEYS {
            let dates: Vec<_> = expand_weekly(from, to, key).collect();

            assert!(!dates.is_empty());
            assert!(dates.iter().all(|x| *x >= from && *x <= to));
            assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(7)));
            assert!(dates.iter().all(|x| weekday_key(*x) == key));
        }
    }

    #[test]
    fn test_full_weeks_count() {
        // Exactly 4 full weeks: each weekday occurs exactly 4 times
        let from = d("2024-01-07");
        let to = d("2024-02-03");

        for key in crate::dates::WEEKDAY_KEYS {
            assert_eq!(expand_weekly(from, to, key).count(), 4, "{}", key);
        }
    }

    #[test]
    fn test_size_hint_matches_count() {
        let occurrences = expand_weekly(d("2024-01-01"), d("2024-03-31"), "friday");
        assert_eq!(occurrences.len(), occurrences.clone().count());
    }

    #[test]
    fn test_restartable() {
        let mut occurrences = expand_weekly(d("2024-01-01"), d("2024-01-31"), "sunday");
        let snapshot = occurrences.clone();

        assert_eq!(occurrences.next(), Some(d("2024-01-07")));
        assert_eq!(snapshot.collect::<Vec<_>>().len(), 4);
        assert_eq!(occurrences.count(), 3);
    }

    #[test]
    fn test_empty_cases() {
        assert_eq!(expand_weekly(d("2024-01-10"), d("2024-01-01"), "monday").count(), 0);
        assert_eq!(expand_weekly(d("2024-01-01"), d("2024-01-31"), "someday").count(), 0);
        // Single-day range that is not the weekday
        assert_eq!(expand_weekly(d("2024-01-02"), d("2024-01-02"), "monday").count(), 0);
        assert_eq!(expand_weekly(d("2024-01-01"), d("2024-01-01"), "monday").count(), 1);
    }

    #[test]
    fn test_try_expand_rejects_unknown_weekday() {
        assert!(matches!(
            try_expand_weekly(d("2024-01-01"), d("2024-01-31"), "mon"),
            Err(ScheduleError::InvalidWeekday { .. })
        ));
        assert_eq!(
            try_expand_weekly(d("2024-01-01"), d("2024-01-31"), "Monday").unwrap().count(),
            5
        );
    }
}
