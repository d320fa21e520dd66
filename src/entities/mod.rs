// Entity Models - the fetched collections the engine consumes
//
// Shapes mirror the rows of the family entity store (snake_case fields,
// ISO dates). The engine never mutates them.

pub mod custody;
pub mod calendar;
pub mod task;

pub use custody::{CustodyOverride, CustodyTemplate, DayMap, WeekBucket};
pub use calendar::{Activity, Event, EventType};
pub use task::{CompletedTask, Task, TaskCategory, LEGACY_HOUSEHOLD_CHORE_LABEL};
