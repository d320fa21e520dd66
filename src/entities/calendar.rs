// 🗓️ Calendar Source Entities - One-off events and weekly activities
//
// Events carry their own dates (optionally a multi-day span).
// Activities carry only a weekday and are expanded per range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// EVENT TYPE
// ============================================================================

/// Event type. Unknown labels are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Holiday,
    Vacation,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Holiday => "holiday",
            EventType::Vacation => "vacation",
            EventType::Other(raw) => raw,
        }
    }

    /// Holidays and school vacations (the "days off" calendar)
    pub fn is_day_off(&self) -> bool {
        matches!(self, EventType::Holiday | EventType::Vacation)
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Other("other".to_string())
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "holiday" => EventType::Holiday,
            "vacation" => EventType::Vacation,
            _ => EventType::Other(raw),
        }
    }
}

impl From<EventType> for String {
    fn from(kind: EventType) -> Self {
        kind.as_str().to_string()
    }
}

// ============================================================================
// EVENT
// ============================================================================

/// One-off (or date-spanning) calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,

    pub date: NaiveDate,

    /// Last day of a multi-day event (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    pub title: String,

    #[serde(default, rename = "type")]
    pub event_type: EventType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Event {
    pub fn new(id: &str, date: NaiveDate, title: &str) -> Self {
        Event {
            id: id.to_string(),
            family_id: None,
            date,
            end_date: None,
            start_time: None,
            end_time: None,
            title: title.to_string(),
            event_type: EventType::default(),
            description: None,
            all_day: None,
            child_ids: None,
            member_ids: None,
            location: None,
            color: None,
        }
    }

    /// Last day the event covers (its own date when single-day)
    pub fn last_day(&self) -> NaiveDate {
        match self.end_date {
            Some(end) if end > self.date => end,
            _ => self.date,
        }
    }
}

// ============================================================================
// ACTIVITY
// ============================================================================

/// Weekly recurring activity on exactly one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,

    pub name: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,

    /// Weekday key, `sunday`..`saturday`
    pub day_of_week: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Activity {
    pub fn new(id: &str, name: &str, day_of_week: &str) -> Self {
        Activity {
            id: id.to_string(),
            family_id: None,
            name: name.to_string(),
            activity_type: None,
            instructor: None,
            day_of_week: day_of_week.to_string(),
            start_time: None,
            end_time: None,
            child_ids: None,
            location: None,
            color: None,
            is_active: true,
        }
    }
}
