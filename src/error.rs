// 🚨 Error Taxonomy
// Data/programmer errors surface immediately; nothing in the engine retries.

use chrono::NaiveDate;
use thiserror::Error;

use crate::schema::ValidationError;

/// Main error type for schedule engine operations
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid date '{value}': expected yyyy-mm-dd")]
    InvalidDate { value: String },

    #[error("Invalid weekday key '{value}': expected sunday..saturday")]
    InvalidWeekday { value: String },

    #[error("Invalid range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    /// More than one override row for the same date under `DuplicatePolicy::Reject`
    #[error("Ambiguous custody override: {count} overrides on {date}")]
    AmbiguousOverride { date: NaiveDate, count: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ValidationError> for ScheduleError {
    fn from(err: ValidationError) -> Self {
        ScheduleError::Validation(vec![err])
    }
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ScheduleError::Validation(errors)
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
