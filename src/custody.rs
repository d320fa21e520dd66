// ⚖️ Custody Resolution - Who is responsible on a given day
//
// Precedence:
//   1. A custody override on the exact date
//   2. The active template's week A/B map, by week parity from its anchor
//   3. Nobody (None)
//
// Parity uses floor division on whole Sunday-weeks, so dates before the
// anchor keep alternating (-1 is week B, -2 is week A).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::dates::{parse_date, weekday_key, weeks_between, DateRange};
use crate::entities::{CustodyOverride, CustodyTemplate, WeekBucket};
use crate::error::{Result, ScheduleError};
use crate::normalize::NameNormalizer;

/// Day → normalized responsible party, ordered by day
pub type CustodyMap = BTreeMap<NaiveDate, String>;

// ============================================================================
// DUPLICATE OVERRIDES
// ============================================================================

/// Handling of more than one override row on the same date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// First row in input order wins; later rows are ignored
    #[default]
    FirstWins,

    /// Fail with `ScheduleError::AmbiguousOverride`
    Reject,
}

/// Dates that carry more than one override, with their row counts
pub fn find_duplicate_overrides(overrides: &[CustodyOverride]) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for row in overrides {
        *counts.entry(row.date).or_insert(0) += 1;
    }

    counts.into_iter().filter(|(_, count)| *count > 1).collect()
}

/// Date-keyed view of the override rows, built under a duplicate policy
#[derive(Debug, Clone)]
pub struct OverrideIndex<'a> {
    by_date: BTreeMap<NaiveDate, &'a CustodyOverride>,
}

impl<'a> OverrideIndex<'a> {
    pub fn build(overrides: &'a [CustodyOverride], policy: DuplicatePolicy) -> Result<Self> {
        let duplicates = find_duplicate_overrides(overrides);

        if let Some((date, count)) = duplicates.first() {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(ScheduleError::AmbiguousOverride {
                        date: *date,
                        count: *count,
                    });
                }
                DuplicatePolicy::FirstWins => {
                    for (date, count) in &duplicates {
                        warn!(%date, count, "duplicate custody overrides, keeping the first");
                    }
                }
            }
        }

        let mut by_date = BTreeMap::new();
        for row in overrides {
            by_date.entry(row.date).or_insert(row);
        }

        Ok(OverrideIndex { by_date })
    }

    pub fn get(&self, date: NaiveDate) -> Option<&'a CustodyOverride> {
        self.by_date.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

// ============================================================================
// WEEK PARITY
// ============================================================================

/// Week bucket of `date` for a usable template, else None
pub fn week_bucket(template: &CustodyTemplate, date: NaiveDate) -> Option<WeekBucket> {
    if !template.is_usable() {
        return None;
    }
    let anchor = template.start_date?;
    Some(WeekBucket::from_weeks_diff(weeks_between(anchor, date)))
}

// ============================================================================
// WEEK VIEW
// ============================================================================

/// One row of the Sunday..Saturday week view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub weekday: String,
    pub bucket: Option<WeekBucket>,
    pub party: Option<String>,
    pub overridden: bool,
    /// Reason given on the override, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// CUSTODY RESOLVER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CustodyResolver {
    normalizer: NameNormalizer,
    policy: DuplicatePolicy,
}

impl CustodyResolver {
    pub fn new(normalizer: NameNormalizer, policy: DuplicatePolicy) -> Self {
        CustodyResolver { normalizer, policy }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        CustodyResolver::new(config.normalizer(), config.duplicate_policy)
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Responsible party on `date`.
    ///
    /// The first override on the exact date wins outright. Otherwise the
    /// template answers, or nothing does when it is absent, inactive or
    /// incomplete.
    pub fn resolve_responsible_party(
        &self,
        date: NaiveDate,
        template: Option<&CustodyTemplate>,
        overrides: &[CustodyOverride],
    ) -> Option<String> {
        if let Some(row) = overrides.iter().find(|o| o.date == date) {
            return Some(self.normalizer.normalize(Some(&row.responsible_party)));
        }

        self.resolve_from_template(date, template?)
    }

    /// Same as `resolve_responsible_party` for an ISO day string
    pub fn resolve_on(
        &self,
        date: &str,
        template: Option<&CustodyTemplate>,
        overrides: &[CustodyOverride],
    ) -> Result<Option<String>> {
        let date = parse_date(date)?;
        Ok(self.resolve_responsible_party(date, template, overrides))
    }

    /// Template-only answer, ignoring overrides
    pub fn resolve_from_template(&self, date: NaiveDate, template: &CustodyTemplate) -> Option<String> {
        let bucket = week_bucket(template, date)?;
        let party = template.week(bucket)?.get(weekday_key(date))?;

        if party.trim().is_empty() {
            return None;
        }

        Some(self.normalizer.normalize(Some(party)))
    }

    fn resolve_indexed(
        &self,
        date: NaiveDate,
        template: Option<&CustodyTemplate>,
        index: &OverrideIndex<'_>,
    ) -> Option<String> {
        if let Some(row) = index.get(date) {
            return Some(self.normalizer.normalize(Some(&row.responsible_party)));
        }

        self.resolve_from_template(date, template?)
    }

    /// Responsible party for every day in `range` that resolves to someone.
    ///
    /// Deterministic for identical inputs, so callers may cache it by
    /// `(family_id, range)`.
    pub fn build_custody_map(
        &self,
        template: Option<&CustodyTemplate>,
        overrides: &[CustodyOverride],
        range: DateRange,
    ) -> Result<CustodyMap> {
        let index = OverrideIndex::build(overrides, self.policy)?;

        if let Some(t) = template {
            if !t.is_usable() {
                debug!(family_id = %t.family_id, "custody template inactive or incomplete, overrides only");
            }
        }

        let map: CustodyMap = range
            .days()
            .filter_map(|day| self.resolve_indexed(day, template, &index).map(|party| (day, party)))
            .collect();

        debug!(
            from = %range.from,
            to = %range.to,
            days = range.len_days(),
            resolved = map.len(),
            "built custody map"
        );

        Ok(map)
    }

    /// The Sunday..Saturday week containing `date`
    pub fn week_view(
        &self,
        date: NaiveDate,
        template: Option<&CustodyTemplate>,
        overrides: &[CustodyOverride],
    ) -> Result<Vec<WeekDay>> {
        let index = OverrideIndex::build(overrides, self.policy)?;

        let days = DateRange::week_of(date)
            .days()
            .map(|day| {
                let row = index.get(day);
                WeekDay {
                    date: day,
                    weekday: weekday_key(day).to_string(),
                    bucket: template.and_then(|t| week_bucket(t, day)),
                    party: self.resolve_indexed(day, template, &index),
                    overridden: row.is_some(),
                    reason: row.and_then(|r| r.reason.clone()),
                }
            })
            .collect();

        Ok(days)
    }
}

// ============================================================================
// TESTS
// ============================================================================
