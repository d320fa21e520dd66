// ✅ Task Eligibility - Which tasks a child owes on a date
//
// Rules, per active task assigned to the child:
//   1. Recurring  → weekday key must be in `recurring_days`
//      One-off    → `due_date` must equal the date
//   2. Household chores are further gated by custody: when the map has an
//      entry for the date, the creator must be the party on duty that day.
//      No entry → the chore is included (fail open).
//
// Task progress is computed on top of the due list, against completion records.
// Weekly scores sum completion points per child over a Sunday..Saturday week.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::custody::CustodyMap;
use crate::dates::{weekday_key, DateRange};
use crate::entities::{CompletedTask, Task};
use crate::normalize::NameNormalizer;

/// Due-task filter with the family's naming and category conventions
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    config: EngineConfig,
    normalizer: NameNormalizer,
}

impl TaskFilter {
    pub fn new(config: EngineConfig) -> Self {
        let normalizer = config.normalizer();
        TaskFilter { config, normalizer }
    }

    /// Tasks `child_id` owes on `date`, in input order
    pub fn due_tasks_for_child_on_date<'a>(
        &self,
        tasks: &'a [Task],
        child_id: &str,
        date: NaiveDate,
        custody_map: &CustodyMap,
    ) -> Vec<&'a Task> {
        let on_duty = custody_map.get(&date);

        let due: Vec<&Task> = tasks
            .iter()
            .filter(|task| task.is_active && task.is_assigned_to(child_id))
            .filter(|task| matches_date(task, date))
            .filter(|task| self.passes_custody_gate(task, on_duty.map(String::as_str)))
            .collect();

        debug!(child_id, date = %date, due = due.len(), "filtered due tasks");
        due
    }

    fn passes_custody_gate(&self, task: &Task, on_duty: Option<&str>) -> bool {
        if !self.config.is_household_chore(&task.category) {
            return true;
        }

        match on_duty {
            Some(party) => self
                .normalizer
                .same_party(task.created_by_party.as_deref(), Some(party)),
            None => true,
        }
    }
}

/// Temporal rule of a task
fn matches_date(task: &Task, date: NaiveDate) -> bool {
    if task.is_recurring {
        let key = weekday_key(date);
        task.recurring_days
            .as_ref()
            .map(|days| days.iter().any(|d| d.trim().eq_ignore_ascii_case(key)))
            .unwrap_or(false)
    } else {
        task.due_date == Some(date)
    }
}

// ============================================================================
// TASK PROGRESS
// ============================================================================

/// Completion status of a child's due tasks on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub child_id: String,
    pub date: NaiveDate,
    pub total: usize,
    pub completed: usize,
    /// Ids of due tasks without a completion record
    pub pending: Vec<String>,
}

impl TaskProgress {
    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Tasks for {} on {}: {}/{} completed, {} pending",
            self.child_id,
            self.date,
            self.completed,
            self.total,
            self.pending.len()
        )
    }
}

/// Count `due` tasks that have a completion record for `child_id` on `date`
pub fn task_progress(
    due: &[&Task],
    completed: &[CompletedTask],
    child_id: &str,
    date: NaiveDate,
) -> TaskProgress {
    let is_completed = |task: &Task| {
        completed
            .iter()
            .any(|c| c.task_id == task.id && c.child_id == child_id && c.completion_date == date)
    };

    let pending: Vec<String> = due
        .iter()
        .filter(|task| !is_completed(**task))
        .map(|task| task.id.clone())
        .collect();

    TaskProgress {
        child_id: child_id.to_string(),
        date,
        total: due.len(),
        completed: due.len() - pending.len(),
        pending,
    }
}

// ============================================================================
// WEEKLY SCORES
// ============================================================================

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildScore {
    pub child_id: String,
    pub points: u32,
    pub completed_count: usize,
}

/// Points per child for completions inside `week`, highest first.
///
/// A completion scores its `points_awarded`, else the task's `points`, else 0.
/// Every listed child gets a row; ties keep `child_ids` order.
pub fn weekly_scores(
    completed: &[CompletedTask],
    tasks: &[Task],
    child_ids: &[String],
    week: DateRange,
) -> Vec<ChildScore> {
    let points_for = |record: &CompletedTask| {
        record.points_awarded.unwrap_or_else(|| {
            tasks
                .iter()
                .find(|t| t.id == record.task_id)
                .and_then(|t| t.points)
                .unwrap_or(0)
        })
    };

    let mut scores: Vec<ChildScore> = child_ids
        .iter()
        .map(|child_id| {
            let records: Vec<&CompletedTask> = completed
                .iter()
                .filter(|c| &c.child_id == child_id && week.contains(c.completion_date))
                .collect();

            ChildScore {
                child_id: child_id.clone(),
                points: records.iter().map(|c| points_for(*c)).sum(),
                completed_count: records.len(),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.points.cmp(&a.points));
    scores
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use crate::entities::TaskCategory;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn map_with(date: &str, party: &str) -> CustodyMap {
        let mut map = CustodyMap::new();
        map.insert(d(date), party.to_string());
        map
    }

    #[test]
    fn test_chore_gated_by_custody() {
        // 2024-01-01 is a Monday
        let tasks = vec![
            Task::recurring("dishes-mom", TaskCategory::HouseholdChore, "kid-1", &["monday"])
                .created_by("Mother Jane"),
            Task::recurring("dishes-dad", TaskCategory::HouseholdChore, "kid-1", &["monday"])
                .created_by("Sam"),
        ];
        let filter = TaskFilter::default();

        let due = filter.due_tasks_for_child_on_date(&tasks, "kid-1", d("2024-01-01"), &map_with("2024-01-01", "Jane"));
        assert_eq!(ids(&due), vec!["dishes-mom"]);

        let due = filter.due_tasks_for_child_on_date(&tasks, "kid-1", d("2024-01-01"), &map_with("2024-01-01", "Sam"));
        assert_eq!(ids(&due), vec!["dishes-dad"]);
    }

    #[test]
    fn test_chore_fails_open_without_custody() {
        let tasks = vec![
            Task::due_on("laundry", TaskCategory::HouseholdChore, "kid-1", d("2024-01-02")).created_by("Sam"),
            Task::due_on("anon", TaskCategory::HouseholdChore, "kid-1", d("2024-01-02")),
        ];

        let due = TaskFilter::default().due_tasks_for_child_on_date(
            &tasks,
            "kid-1",
            d("2024-01-02"),
            &map_with("2024-01-01", "Jane"),
        );
        assert_eq!(ids(&due), vec!["laundry", "anon"]);
    }

    #[test]
    fn test_non_chores_ignore_custody() {
        let tasks = vec![
            Task::due_on("math", TaskCategory::Homework, "kid-1", d("2024-01-01")).created_by("Sam"),
            Task::recurring("piano", TaskCategory::Personal, "kid-1", &["monday"]).created_by("Sam"),
        ];

        let due = TaskFilter::default().due_tasks_for_child_on_date(
            &tasks,
            "kid-1",
            d("2024-01-01"),
            &map_with("2024-01-01", "Jane"),
        );
        assert_eq!(ids(&due), vec!["math", "piano"]);
    }

    #[test]
    fn test_temporal_rules() {
        let mut inactive = Task::due_on("old", TaskCategory::Homework, "kid-1", d("2024-01-01"));
        inactive.is_active = false;
        let mut no_days = Task::recurring("broken", TaskCategory::Homework, "kid-1", &[]);
        no_days.recurring_days = None;

        let tasks = vec![
            Task::due_on("today", TaskCategory::Homework, "kid-1", d("2024-01-01")),
            Task::due_on("tomorrow", TaskCategory::Homework, "kid-1", d("2024-01-02")),
            Task::recurring("mon-wed", TaskCategory::Homework, "kid-1", &["Monday", "wednesday"]),
            Task::recurring("tue", TaskCategory::Homework, "kid-1", &["tuesday"]),
            Task::due_on("sibling", TaskCategory::Homework, "kid-2", d("2024-01-01")),
            inactive,
            no_days,
        ];

        let due = TaskFilter::default().due_tasks_for_child_on_date(&tasks, "kid-1", d("2024-01-01"), &CustodyMap::new());
        assert_eq!(ids(&due), vec!["today", "mon-wed"]);
    }

    #[test]
    fn test_configured_chore_labels_are_gated() {
        let mut config = EngineConfig::default();
        config.household_chore_categories.push("kitchen".to_string());
        let tasks = vec![
            Task::due_on("fridge", TaskCategory::from("kitchen".to_string()), "kid-1", d("2024-01-01"))
                .created_by("Sam"),
        ];

        let due = TaskFilter::new(config).due_tasks_for_child_on_date(
            &tasks,
            "kid-1",
            d("2024-01-01"),
            &map_with("2024-01-01", "Jane"),
        );
        assert!(due.is_empty());
    }

    #[test]
    fn test_task_progress() {
        let tasks = vec![
            Task::due_on("math", TaskCategory::Homework, "kid-1", d("2024-01-01")),
            Task::due_on("reading", TaskCategory::Homework, "kid-1", d("2024-01-01")),
            Task::recurring("bed", TaskCategory::HouseholdChore, "kid-1", &["monday"]),
        ];
        let due: Vec<&Task> = tasks.iter().collect();
        let completed = vec![
            CompletedTask::new("math", "kid-1", d("2024-01-01")),
            // Wrong day and wrong child do not count
            CompletedTask::new("reading", "kid-1", d("2023-12-31")),
            CompletedTask::new("bed", "kid-2", d("2024-01-01")),
        ];

        let progress = task_progress(&due, &completed, "kid-1", d("2024-01-01"));

        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.pending, vec!["reading", "bed"]);
        assert!(!progress.is_done());
        assert_eq!(
            progress.summary(),
            "Tasks for kid-1 on 2024-01-01: 1/3 completed, 2 pending"
        );
    }

    #[test]
    fn test_weekly_scores() {
        let mut dishes = Task::recurring("dishes", TaskCategory::HouseholdChore, "kid-1", &["monday"]);
        dishes.points = Some(5);
        let tasks = vec![dishes, Task::due_on("math", TaskCategory::Homework, "kid-2", d("2024-01-09"))];

        let completed = vec![
            CompletedTask::new("dishes", "kid-1", d("2024-01-08")),
            CompletedTask::new("dishes", "kid-1", d("2024-01-13")),
            CompletedTask::new("math", "kid-2", d("2024-01-09")).with_points(20),
            // Outside the week
            CompletedTask::new("dishes", "kid-1", d("2024-01-06")),
            CompletedTask::new("math", "kid-2", d("2024-01-14")).with_points(20),
            // No points anywhere
            CompletedTask::new("math", "kid-3", d("2024-01-10")),
        ];
        let children: Vec<String> = ["kid-1", "kid-2", "kid-3", "kid-4"].iter().map(|s| s.to_string()).collect();

        let scores = weekly_scores(&completed, &tasks, &children, DateRange::week_of(d("2024-01-10")));

        let rows: Vec<_> = scores
            .iter()
            .map(|s| (s.child_id.as_str(), s.points, s.completed_count))
            .collect();
        assert_eq!(
            rows,
            vec![("kid-2", 20, 1), ("kid-1", 10, 2), ("kid-3", 0, 1), ("kid-4", 0, 0)]
        );
    }

    #[test]
    fn test_task_progress_nothing_due() {
        let progress = task_progress(&[], &[], "kid-1", d("2024-01-01"));
        assert_eq!(progress.total, 0);
        assert!(progress.is_done());
    }
}
