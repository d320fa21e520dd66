// Family Schedule Engine - Core Library
// Custody resolution and the unified schedule, exposed for the CLI and tests

pub mod error;      // Error taxonomy
pub mod dates;      // ISO dates, weekday keys, inclusive ranges
pub mod entities;   // Templates, overrides, events, activities, tasks
pub mod schema;     // Shape Layer - Schema Validation
pub mod normalize;  // Honorific prefix stripping
pub mod config;     // Engine configuration (JSON)
pub mod custody;    // Custody Resolver, map builder, week view
pub mod recurrence; // Weekly occurrence expansion
pub mod calendar;   // Calendar Merger
pub mod tasks;      // Task eligibility and progress
pub mod cache;      // Custody map memoization
pub mod snapshot;   // Family snapshot loading
pub mod export;     // CSV output
pub mod engine;     // Facade over a family snapshot

// Re-export commonly used types
pub use error::{Result, ScheduleError};
pub use dates::{parse_date, parse_weekday, weekday_key, DateRange, WEEKDAY_KEYS};
pub use entities::{
    Activity, CompletedTask, CustodyOverride, CustodyTemplate, DayMap,
    Event, EventType, Task, TaskCategory, WeekBucket,
};
pub use schema::{SchemaValidator, ValidationError, ValidationResult};
pub use normalize::NameNormalizer;
pub use config::EngineConfig;
pub use custody::{
    CustodyMap, CustodyResolver, DuplicatePolicy, OverrideIndex, WeekDay,
};
pub use recurrence::{expand_weekly, WeeklyOccurrences};
pub use calendar::{upcoming, CalendarFilter, CalendarItem, CalendarItemKind, CalendarMerger};
pub use tasks::{task_progress, weekly_scores, ChildScore, TaskFilter, TaskProgress};
pub use cache::{CacheStats, ScheduleCache};
pub use snapshot::FamilySnapshot;
pub use engine::ScheduleEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
