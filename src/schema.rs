// 📐 Shape Layer - Schema Validation
// Validates fetched entities before the engine relies on them

use crate::dates::{parse_weekday, WEEKDAY_KEYS};
use crate::entities::{Activity, CustodyOverride, CustodyTemplate, DayMap, Task};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    pub fn new(context: &str, field: &str, message: &str) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.to_string(),
            context: context.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        SchemaValidator
    }

    /// Template must carry an anchor and both weeks keyed by weekday
    pub fn validate_template(&self, template: &CustodyTemplate) -> ValidationResult {
        let mut errors = Vec::new();
        let context = "CustodyTemplate";

        if template.family_id.is_empty() {
            errors.push(ValidationError::new(context, "family_id", "Required field is empty"));
        }

        if template.start_date.is_none() {
            errors.push(ValidationError::new(context, "start_date", "Required field is missing"));
        }

        match &template.week_a {
            Some(week) => check_day_map(week, "week_a", &mut errors),
            None => errors.push(ValidationError::new(context, "week_a", "Required field is missing")),
        }

        match &template.week_b {
            Some(week) => check_day_map(week, "week_b", &mut errors),
            None => errors.push(ValidationError::new(context, "week_b", "Required field is missing")),
        }

        into_result(errors)
    }

    pub fn validate_override(&self, row: &CustodyOverride) -> ValidationResult {
        let mut errors = Vec::new();
        let context = "CustodyOverride";

        if row.family_id.is_empty() {
            errors.push(ValidationError::new(context, "family_id", "Required field is empty"));
        }

        if row.responsible_party.trim().is_empty() {
            errors.push(ValidationError::new(context, "responsible_party", "Required field is empty"));
        }

        into_result(errors)
    }

    pub fn validate_activity(&self, activity: &Activity) -> ValidationResult {
        let mut errors = Vec::new();
        let context = "Activity";

        if activity.id.is_empty() {
            errors.push(ValidationError::new(context, "id", "Required field is empty"));
        }

        if parse_weekday(&activity.day_of_week).is_err() {
            errors.push(ValidationError::new(
                context,
                "day_of_week",
                &format!("Unrecognized weekday key '{}'", activity.day_of_week),
            ));
        }

        into_result(errors)
    }

    /// Exactly one temporal rule: recurring days when recurring, due date otherwise
    pub fn validate_task(&self, task: &Task) -> ValidationResult {
        let mut errors = Vec::new();
        let context = "Task";

        if task.id.is_empty() {
            errors.push(ValidationError::new(context, "id", "Required field is empty"));
        }

        if task.is_recurring {
            match &task.recurring_days {
                Some(days) if !days.is_empty() => {
                    for day in days {
                        if parse_weekday(day).is_err() {
                            errors.push(ValidationError::new(
                                context,
                                "recurring_days",
                                &format!("Unrecognized weekday key '{}'", day),
                            ));
                        }
                    }
                }
                _ => errors.push(ValidationError::new(
                    context,
                    "recurring_days",
                    "Required when is_recurring is true",
                )),
            }

            if task.due_date.is_some() {
                errors.push(ValidationError::new(
                    context,
                    "due_date",
                    "Must be empty when is_recurring is true",
                ));
            }
        } else if task.due_date.is_none() {
            errors.push(ValidationError::new(
                context,
                "due_date",
                "Required when is_recurring is false",
            ));
        }

        into_result(errors)
    }
}

fn check_day_map(week: &DayMap, field: &str, errors: &mut Vec<ValidationError>) {
    for (key, party) in week {
        if !WEEKDAY_KEYS.contains(&key.as_str()) {
            errors.push(ValidationError::new(
                "CustodyTemplate",
                field,
                &format!("Unrecognized weekday key '{}'", key),
            ));
        } else if party.trim().is_empty() {
            errors.push(ValidationError::new(
                "CustodyTemplate",
                field,
                &format!("Empty responsible party for '{}'", key),
            ));
        }
    }
}
