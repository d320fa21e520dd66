// 👪 Custody Entities - Biweekly template + single-date overrides
//
// A template alternates two week maps (A and B) from an anchor date.
// An override pins one date to one responsible party and beats the template.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weekday key (`sunday`..`saturday`) → responsible party name
pub type DayMap = BTreeMap<String, String>;

// ============================================================================
// WEEK BUCKET
// ============================================================================

/// Which half of the biweekly cycle a date falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekBucket {
    A,
    B,
}

impl WeekBucket {
    /// Bucket for a signed week offset from the anchor week (-1 is B, -2 is A)
    pub fn from_weeks_diff(weeks_diff: i64) -> Self {
        if weeks_diff.rem_euclid(2) == 0 {
            WeekBucket::A
        } else {
            WeekBucket::B
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekBucket::A => "A",
            WeekBucket::B => "B",
        }
    }

    pub fn other(&self) -> WeekBucket {
        match self {
            WeekBucket::A => WeekBucket::B,
            WeekBucket::B => WeekBucket::A,
        }
    }
}

// ============================================================================
// CUSTODY TEMPLATE
// ============================================================================

/// Biweekly alternating custody pattern for one family.
///
/// `start_date` is an arbitrary anchor: the Sunday-week containing it is
/// week A. The anchor and both week maps are optional because the entity
/// store can hold half-edited templates; such templates resolve nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustodyTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub family_id: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub week_a: Option<DayMap>,

    #[serde(default)]
    pub week_b: Option<DayMap>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl CustodyTemplate {
    /// Active template with both weeks and an anchor
    pub fn new(family_id: &str, start_date: NaiveDate, week_a: DayMap, week_b: DayMap) -> Self {
        CustodyTemplate {
            id: None,
            family_id: family_id.to_string(),
            start_date: Some(start_date),
            week_a: Some(week_a),
            week_b: Some(week_b),
            is_active: true,
        }
    }

    /// Active and carrying every field the resolver needs
    pub fn is_usable(&self) -> bool {
        self.is_active && self.start_date.is_some() && self.week_a.is_some() && self.week_b.is_some()
    }

    /// Week map for a bucket, if present
    pub fn week(&self, bucket: WeekBucket) -> Option<&DayMap> {
        match bucket {
            WeekBucket::A => self.week_a.as_ref(),
            WeekBucket::B => self.week_b.as_ref(),
        }
    }

    /// First active template for `family_id`, in source order
    pub fn select_active<'a>(templates: &'a [CustodyTemplate], family_id: &str) -> Option<&'a CustodyTemplate> {
        templates
            .iter()
            .find(|t| t.is_active && t.family_id == family_id)
    }
}

// ============================================================================
// CUSTODY OVERRIDE
// ============================================================================

/// Single-date exception that supersedes the template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub family_id: String,

    pub date: NaiveDate,

    #[serde(alias = "responsible_parent")]
    pub responsible_party: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CustodyOverride {
    pub fn new(family_id: &str, date: NaiveDate, responsible_party: &str) -> Self {
        CustodyOverride {
            id: None,
            family_id: family_id.to_string(),
            date,
            responsible_party: responsible_party.to_string(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}
