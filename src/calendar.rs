// 🗓️ Calendar Merger - One ordered view over events, activities and custody
//
// Sources, in encounter order:
//   1. Events overlapping the range
//   2. Active activities expanded to weekly occurrences (id = "{activity}:{date}")
//   3. Custody entries (id = "custody:{date}")
//
// The result is stably sorted by "{date} {start_time or 00:00}", so untimed
// items open their day and ties keep encounter order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::custody::CustodyMap;
use crate::dates::DateRange;
use crate::entities::{Activity, Event, EventType};
use crate::recurrence::expand_weekly;

// ============================================================================
// CALENDAR ITEM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarItemKind {
    Event,
    Activity,
    Custody,
}

impl CalendarItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarItemKind::Event => "event",
            CalendarItemKind::Activity => "activity",
            CalendarItemKind::Custody => "custody",
        }
    }
}

/// Source-specific details carried by a calendar item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarMeta {
    Event {
        #[serde(rename = "type")]
        event_type: EventType,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        all_day: Option<bool>,
    },
    Activity {
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        activity_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        instructor: Option<String>,
        recurring: bool,
    },
    Custody {
        responsible_party: String,
    },
}

/// Unified calendar entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: String,
    pub kind: CalendarItemKind,
    pub date: NaiveDate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_ids: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_ids: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub meta: CalendarMeta,
}

impl CalendarItem {
    fn from_event(event: &Event) -> Self {
        CalendarItem {
            id: event.id.clone(),
            kind: CalendarItemKind::Event,
            date: event.date,
            end_date: event.end_date,
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            title: event.title.clone(),
            color: event.color.clone(),
            child_ids: event.child_ids.clone(),
            member_ids: event.member_ids.clone(),
            location: event.location.clone(),
            meta: CalendarMeta::Event {
                event_type: event.event_type.clone(),
                description: event.description.clone(),
                all_day: event.all_day,
            },
        }
    }

    fn from_activity(activity: &Activity, date: NaiveDate, default_color: &str) -> Self {
        CalendarItem {
            id: format!("{}:{}", activity.id, date),
            kind: CalendarItemKind::Activity,
            date,
            end_date: None,
            start_time: activity.start_time.clone(),
            end_time: activity.end_time.clone(),
            title: activity.name.clone(),
            color: Some(
                activity
                    .color
                    .clone()
                    .unwrap_or_else(|| default_color.to_string()),
            ),
            child_ids: activity.child_ids.clone(),
            member_ids: None,
            location: activity.location.clone(),
            meta: CalendarMeta::Activity {
                activity_type: activity.activity_type.clone(),
                instructor: activity.instructor.clone(),
                recurring: true,
            },
        }
    }

    fn from_custody(date: NaiveDate, party: &str, config: &EngineConfig) -> Self {
        CalendarItem {
            id: format!("custody:{}", date),
            kind: CalendarItemKind::Custody,
            date,
            end_date: None,
            start_time: None,
            end_time: None,
            title: format!("{}{}", config.custody_title_prefix, party),
            color: Some(config.color_for_party(party).to_string()),
            child_ids: None,
            member_ids: None,
            location: None,
            meta: CalendarMeta::Custody {
                responsible_party: party.to_string(),
            },
        }
    }

    /// Ordering key: `"{date} {start_time}"` with untimed items at `00:00`
    pub fn sort_key(&self) -> String {
        format!("{} {}", self.date, self.start_time.as_deref().unwrap_or("00:00"))
    }

    /// Last day the item covers
    pub fn last_day(&self) -> NaiveDate {
        match self.end_date {
            Some(end) if end > self.date => end,
            _ => self.date,
        }
    }

    /// Holiday or vacation event
    pub fn is_day_off(&self) -> bool {
        matches!(&self.meta, CalendarMeta::Event { event_type, .. } if event_type.is_day_off())
    }

    /// Responsible party of a custody item
    pub fn responsible_party(&self) -> Option<&str> {
        match &self.meta {
            CalendarMeta::Custody { responsible_party } => Some(responsible_party),
            _ => None,
        }
    }

    /// Items without child ids concern everyone
    fn concerns_any(&self, child_ids: &[String]) -> bool {
        match &self.child_ids {
            Some(ids) if !ids.is_empty() => ids.iter().any(|id| child_ids.contains(id)),
            _ => true,
        }
    }
}

// ============================================================================
// FILTERS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarFilter {
    /// Keep event/activity items for any of these children (empty = all)
    #[serde(default)]
    pub child_ids: Vec<String>,

    /// Keep only events of these types (empty = all)
    #[serde(default)]
    pub event_types: Vec<EventType>,

    /// Keep only holiday and vacation events
    #[serde(default)]
    pub days_off_only: bool,
}

impl CalendarFilter {
    pub fn for_children(child_ids: &[&str]) -> Self {
        CalendarFilter {
            child_ids: child_ids.iter().map(|id| id.to_string()).collect(),
            ..CalendarFilter::default()
        }
    }

    /// Events that are days off (holidays, vacations)
    pub fn days_off() -> Self {
        CalendarFilter {
            days_off_only: true,
            ..CalendarFilter::default()
        }
    }

    pub fn with_event_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = types;
        self
    }

    fn keeps_event_type(&self, event_type: &EventType) -> bool {
        if self.days_off_only && !event_type.is_day_off() {
            return false;
        }
        self.event_types.is_empty() || self.event_types.contains(event_type)
    }

    fn keeps(&self, item: &CalendarItem) -> bool {
        if item.kind == CalendarItemKind::Custody || self.child_ids.is_empty() {
            return true;
        }
        item.concerns_any(&self.child_ids)
    }
}

// ============================================================================
// CALENDAR MERGER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CalendarMerger {
    config: EngineConfig,
}

impl CalendarMerger {
    pub fn new(config: EngineConfig) -> Self {
        CalendarMerger { config }
    }

    /// Merge every source into one sorted, range-bounded sequence
    pub fn build_calendar_window(
        &self,
        events: &[Event],
        activities: &[Activity],
        custody_map: &CustodyMap,
        range: DateRange,
        filter: &CalendarFilter,
    ) -> Vec<CalendarItem> {
        if range.is_empty() {
            debug!(from = %range.from, to = %range.to, "inverted range, empty calendar");
            return Vec::new();
        }

        let mut items = Vec::new();

        // 1) Events overlapping the range
        items.extend(
            events
                .iter()
                .filter(|e| range.overlaps(e.date, e.last_day()))
                .filter(|e| filter.keeps_event_type(&e.event_type))
                .map(CalendarItem::from_event),
        );
        let event_count = items.len();

        // 2) Activities, one item per weekly occurrence
        for activity in activities.iter().filter(|a| a.is_active) {
            items.extend(
                expand_weekly(range.from, range.to, &activity.day_of_week).map(|date| {
                    CalendarItem::from_activity(activity, date, &self.config.default_activity_color)
                }),
            );
        }
        let activity_count = items.len() - event_count;

        // 3) Custody entries inside the range
        items.extend(
            custody_map
                .range(range.from..=range.to)
                .map(|(date, party)| CalendarItem::from_custody(*date, party, &self.config)),
        );

        items.retain(|item| filter.keeps(item));
        items.sort_by_key(CalendarItem::sort_key);

        debug!(
            from = %range.from,
            to = %range.to,
            events = event_count,
            activities = activity_count,
            total = items.len(),
            "built calendar window"
        );

        items
    }
}

/// First `limit` items still running on or after `from`, in calendar order
pub fn upcoming(items: &[CalendarItem], from: NaiveDate, limit: usize) -> Vec<&CalendarItem> {
    items
        .iter()
        .filter(|item| item.last_day() >= from)
        .take(limit)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
