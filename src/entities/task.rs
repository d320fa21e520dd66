// ✅ Task Entities - Chores, homework and personal tasks
//
// Exactly one temporal rule per task: `recurring_days` when recurring,
// `due_date` otherwise. Household chores are additionally gated by custody.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Legacy label the entity store uses for household chores
pub const LEGACY_HOUSEHOLD_CHORE_LABEL: &str = "מטלות בית";

// ============================================================================
// TASK CATEGORY
// ============================================================================

/// Task category. Unknown labels are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskCategory {
    /// Gated by who holds custody on the day
    HouseholdChore,
    Homework,
    Personal,
    Other(String),
}

impl TaskCategory {
    pub fn as_str(&self) -> &str {
        match self {
            TaskCategory::HouseholdChore => "household_chore",
            TaskCategory::Homework => "homework",
            TaskCategory::Personal => "personal",
            TaskCategory::Other(raw) => raw,
        }
    }
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Other(String::new())
    }
}

impl From<String> for TaskCategory {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed == LEGACY_HOUSEHOLD_CHORE_LABEL {
            return TaskCategory::HouseholdChore;
        }
        match trimmed.to_lowercase().as_str() {
            "household_chore" | "household" | "chore" | "house_fixed" => TaskCategory::HouseholdChore,
            "homework" | "child_homework" => TaskCategory::Homework,
            "personal" => TaskCategory::Personal,
            _ => TaskCategory::Other(raw),
        }
    }
}

impl From<TaskCategory> for String {
    fn from(category: TaskCategory) -> Self {
        category.as_str().to_string()
    }
}

// ============================================================================
// TASK
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,

    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub assigned_child_ids: Vec<String>,

    #[serde(default)]
    pub category: TaskCategory,

    #[serde(default)]
    pub is_recurring: bool,

    /// Weekday keys, used only when `is_recurring`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_days: Option<Vec<String>>,

    /// Used only when not recurring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Party who created the task (may carry an honorific prefix)
    #[serde(default, alias = "created_by_parent", skip_serializing_if = "Option::is_none")]
    pub created_by_party: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl Task {
    /// One-off task due on `due_date`
    pub fn due_on(id: &str, category: TaskCategory, child_id: &str, due_date: NaiveDate) -> Self {
        Task {
            id: id.to_string(),
            family_id: None,
            title: None,
            assigned_child_ids: vec![child_id.to_string()],
            category,
            is_recurring: false,
            recurring_days: None,
            due_date: Some(due_date),
            created_by_party: None,
            is_active: true,
            points: None,
        }
    }

    /// Recurring task on the given weekday keys
    pub fn recurring(id: &str, category: TaskCategory, child_id: &str, days: &[&str]) -> Self {
        Task {
            id: id.to_string(),
            family_id: None,
            title: None,
            assigned_child_ids: vec![child_id.to_string()],
            category,
            is_recurring: true,
            recurring_days: Some(days.iter().map(|d| d.to_string()).collect()),
            due_date: None,
            created_by_party: None,
            is_active: true,
            points: None,
        }
    }

    pub fn created_by(mut self, party: &str) -> Self {
        self.created_by_party = Some(party.to_string());
        self
    }

    pub fn is_assigned_to(&self, child_id: &str) -> bool {
        self.assigned_child_ids.iter().any(|id| id == child_id)
    }
}

// ============================================================================
// COMPLETED TASK
// ============================================================================

/// Record that a child completed a task on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub task_id: String,

    pub child_id: String,

    /// Accepts a plain day or a full timestamp; only the day is kept
    #[serde(deserialize_with = "deserialize_day")]
    pub completion_date: NaiveDate,

    /// Points granted for this completion; falls back to the task's `points`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<u32>,
}

impl CompletedTask {
    pub fn new(task_id: &str, child_id: &str, completion_date: NaiveDate) -> Self {
        CompletedTask {
            task_id: task_id.to_string(),
            child_id: child_id.to_string(),
            completion_date,
            points_awarded: None,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points_awarded = Some(points);
        self
    }
}

fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}
