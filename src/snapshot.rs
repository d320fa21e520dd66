// 📦 Family Snapshot - Entity store export as one JSON document
//
// {
//   "family_id": "fam-1",
//   "templates": [...], "overrides": [...],
//   "events": [...], "activities": [...],
//   "tasks": [...], "completed": [...]
// }
//
// Every collection is optional. Rows from other families are dropped by
// `for_family`; rows without a family id are kept.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::entities::{Activity, CompletedTask, CustodyOverride, CustodyTemplate, Event, Task};
use crate::schema::{SchemaValidator, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,

    #[serde(default)]
    pub templates: Vec<CustodyTemplate>,

    #[serde(default)]
    pub overrides: Vec<CustodyOverride>,

    #[serde(default)]
    pub events: Vec<Event>,

    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub completed: Vec<CompletedTask>,
}

impl FamilySnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read snapshot file: {:?}", path.as_ref()))?;

        let snapshot: FamilySnapshot = serde_json::from_str(&content)
            .context("Failed to parse snapshot JSON")?;

        debug!(
            templates = snapshot.templates.len(),
            overrides = snapshot.overrides.len(),
            events = snapshot.events.len(),
            activities = snapshot.activities.len(),
            tasks = snapshot.tasks.len(),
            "loaded snapshot"
        );

        Ok(snapshot)
    }

    /// Family to operate on: the explicit one, else the snapshot's own
    pub fn resolve_family_id(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.family_id.clone())
    }

    /// Copy restricted to one family
    pub fn for_family(&self, family_id: &str) -> FamilySnapshot {
        let belongs = |id: Option<&String>| id.map_or(true, |id| id == family_id);

        FamilySnapshot {
            family_id: Some(family_id.to_string()),
            templates: self
                .templates
                .iter()
                .filter(|t| t.family_id == family_id)
                .cloned()
                .collect(),
            overrides: self
                .overrides
                .iter()
                .filter(|o| o.family_id == family_id)
                .cloned()
                .collect(),
            events: self.events.iter().filter(|e| belongs(e.family_id.as_ref())).cloned().collect(),
            activities: self
                .activities
                .iter()
                .filter(|a| belongs(a.family_id.as_ref()))
                .cloned()
                .collect(),
            tasks: self.tasks.iter().filter(|t| belongs(t.family_id.as_ref())).cloned().collect(),
            completed: self.completed.clone(),
        }
    }

    /// The family's active template, if any
    pub fn active_template(&self, family_id: &str) -> Option<&CustodyTemplate> {
        let template = CustodyTemplate::select_active(&self.templates, family_id);
        if template.is_none() {
            debug!(family_id, "no active custody template, overrides only");
        }
        template
    }

    /// Run every row through the validator. Problems are logged, not fatal.
    pub fn validate(&self, validator: &SchemaValidator) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for template in self.templates.iter().filter(|t| t.is_active) {
            errors.extend(validator.validate_template(template).err().unwrap_or_default());
        }
        for row in &self.overrides {
            errors.extend(validator.validate_override(row).err().unwrap_or_default());
        }
        for activity in self.activities.iter().filter(|a| a.is_active) {
            errors.extend(validator.validate_activity(activity).err().unwrap_or_default());
        }
        for task in self.tasks.iter().filter(|t| t.is_active) {
            errors.extend(validator.validate_task(task).err().unwrap_or_default());
        }

        for error in &errors {
            warn!(%error, "snapshot row failed validation");
        }

        errors
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaskCategory;
    use serde_json::json;
    use std::io::Write;

    fn fixture() -> serde_json::Value {
        json!({
            "family_id": "fam-1",
            "templates": [
                {
                    "family_id": "fam-2",
                    "start_date": "2024-01-07",
                    "week_a": { "sunday": "Ola" },
                    "week_b": { "sunday": "Per" }
                },
                {
                    "family_id": "fam-1",
                    "start_date": "2024-01-07",
                    "week_a": { "sunday": "Mother Jane", "monday": "Mother Jane" },
                    "week_b": { "sunday": "Sam", "monday": "Sam" },
                    "is_active": true
                }
            ],
            "overrides": [
                { "family_id": "fam-1", "date": "2024-01-08", "responsible_parent": "Sam" },
                { "family_id": "fam-2", "date": "2024-01-08", "responsible_party": "Per" }
            ],
            "events": [
                { "id": "ev-1", "family_id": "fam-1", "date": "2024-01-10", "title": "Recital", "type": "holiday" },
                { "id": "ev-2", "family_id": "fam-2", "date": "2024-01-10", "title": "Other family" },
                { "id": "ev-3", "date": "2024-01-11", "title": "Shared" }
            ],
            "activities": [
                { "id": "swim", "family_id": "fam-1", "name": "Swimming", "day_of_week": "monday" },
                { "id": "bad", "family_id": "fam-1", "name": "Broken", "day_of_week": "mon" }
            ],
            "tasks": [
                {
                    "id": "dishes",
                    "family_id": "fam-1",
                    "description": "Dishes",
                    "assigned_child_ids": ["kid-1"],
                    "category": "מטלות בית",
                    "is_recurring": true,
                    "recurring_days": ["monday"],
                    "created_by_parent": "Mother Jane"
                }
            ],
            "completed": [
                { "task_id": "dishes", "child_id": "kid-1", "completion_date": "2024-01-08T18:30:00Z" }
            ]
        })
    }

    fn snapshot() -> FamilySnapshot {
        serde_json::from_value(fixture()).unwrap()
    }

    #[test]
    fn test_parses_legacy_field_names() {
        let snapshot = snapshot();

        assert_eq!(snapshot.overrides[0].responsible_party, "Sam");
        assert_eq!(snapshot.tasks[0].created_by_party.as_deref(), Some("Mother Jane"));
        assert_eq!(snapshot.tasks[0].category, TaskCategory::HouseholdChore);
        assert_eq!(snapshot.tasks[0].title.as_deref(), Some("Dishes"));
        assert_eq!(snapshot.completed[0].completion_date.to_string(), "2024-01-08");
    }

    #[test]
    fn test_for_family_filters_rows() {
        let family = snapshot().for_family("fam-1");

        assert_eq!(family.templates.len(), 1);
        assert_eq!(family.overrides.len(), 1);
        let event_ids: Vec<_> = family.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(event_ids, vec!["ev-1", "ev-3"]);
        assert_eq!(family.activities.len(), 2);
        assert!(family.active_template("fam-1").is_some());
        assert!(family.active_template("fam-2").is_none());
    }

    #[test]
    fn test_resolve_family_id() {
        let snapshot = snapshot();

        assert_eq!(snapshot.resolve_family_id(None).as_deref(), Some("fam-1"));
        assert_eq!(snapshot.resolve_family_id(Some("fam-2")).as_deref(), Some("fam-2"));
        assert_eq!(FamilySnapshot::default().resolve_family_id(None), None);
    }

    #[test]
    fn test_validate_reports_bad_rows() {
        let family = snapshot().for_family("fam-1");
        let errors = family.validate(&SchemaValidator::new());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "day_of_week");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", fixture()).unwrap();

        let snapshot = FamilySnapshot::from_file(file.path()).unwrap();
        assert_eq!(snapshot.templates.len(), 2);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{ \"templates\": 3 }}").unwrap();
        let err = FamilySnapshot::from_file(broken.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse snapshot JSON"));
    }

    #[test]
    fn test_empty_document() {
        let snapshot: FamilySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.templates.is_empty());
        assert!(snapshot.family_id.is_none());
    }
}
