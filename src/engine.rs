// 🧭 Schedule Engine - One entry point over a family's snapshot
//
// Wires the resolver, merger and task filter to a shared configuration, and
// routes custody map building through the cache. Expects a snapshot already
// scoped with `FamilySnapshot::for_family`.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::cache::ScheduleCache;
use crate::calendar::{CalendarFilter, CalendarItem, CalendarMerger};
use crate::config::EngineConfig;
use crate::custody::{CustodyMap, CustodyResolver, WeekDay};
use crate::dates::DateRange;
use crate::entities::Task;
use crate::error::Result;
use crate::snapshot::FamilySnapshot;
use crate::tasks::{task_progress, weekly_scores, ChildScore, TaskFilter, TaskProgress};

#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: EngineConfig,
    resolver: CustodyResolver,
    merger: CalendarMerger,
    task_filter: TaskFilter,
    cache: ScheduleCache,
}

impl ScheduleEngine {
    pub fn new(config: EngineConfig) -> Self {
        ScheduleEngine {
            resolver: CustodyResolver::from_config(&config),
            merger: CalendarMerger::new(config.clone()),
            task_filter: TaskFilter::new(config.clone()),
            cache: ScheduleCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &CustodyResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ScheduleCache {
        &self.cache
    }

    /// Responsible party on one date
    pub fn responsible_party(&self, family: &FamilySnapshot, date: NaiveDate) -> Option<String> {
        let family_id = family_id(family);
        self.resolver.resolve_responsible_party(
            date,
            family.active_template(family_id),
            &family.overrides,
        )
    }

    /// Custody map for `range`, served from the cache when inputs are unchanged
    pub fn custody_map(&self, family: &FamilySnapshot, range: DateRange) -> Result<CustodyMap> {
        let family_id = family_id(family);
        self.cache.get_or_build(
            &self.resolver,
            family_id,
            family.active_template(family_id),
            &family.overrides,
            range,
        )
    }

    pub fn week_view(&self, family: &FamilySnapshot, date: NaiveDate) -> Result<Vec<WeekDay>> {
        let family_id = family_id(family);
        self.resolver
            .week_view(date, family.active_template(family_id), &family.overrides)
    }

    /// Events, activities and custody entries for `range`, in calendar order
    pub fn calendar(
        &self,
        family: &FamilySnapshot,
        range: DateRange,
        filter: &CalendarFilter,
    ) -> Result<Vec<CalendarItem>> {
        let custody_map = self.custody_map(family, range)?;
        Ok(self.merger.build_calendar_window(
            &family.events,
            &family.activities,
            &custody_map,
            range,
            filter,
        ))
    }

    pub fn due_tasks<'a>(
        &self,
        family: &'a FamilySnapshot,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<&'a Task>> {
        let custody_map = self.custody_map(family, DateRange::day(date))?;
        Ok(self
            .task_filter
            .due_tasks_for_child_on_date(&family.tasks, child_id, date, &custody_map))
    }

    pub fn task_progress(
        &self,
        family: &FamilySnapshot,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<TaskProgress> {
        let due = self.due_tasks(family, child_id, date)?;
        Ok(task_progress(&due, &family.completed, child_id, date))
    }

    /// Leaderboard for the Sunday..Saturday week containing `date`.
    ///
    /// With no `child_ids`, every child assigned to a task is ranked.
    pub fn weekly_scores(
        &self,
        family: &FamilySnapshot,
        date: NaiveDate,
        child_ids: &[String],
    ) -> Vec<ChildScore> {
        let children: Vec<String> = if child_ids.is_empty() {
            family
                .tasks
                .iter()
                .flat_map(|t| t.assigned_child_ids.iter().cloned())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            child_ids.to_vec()
        };

        weekly_scores(&family.completed, &family.tasks, &children, DateRange::week_of(date))
    }
}

fn family_id(family: &FamilySnapshot) -> &str {
    family.family_id.as_deref().unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarItemKind;
    use crate::dates::parse_date;
    use serde_json::json;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn family() -> FamilySnapshot {
        let snapshot: FamilySnapshot = serde_json::from_value(json!({
            "templates": [{
                "family_id": "fam-1",
                "start_date": "2024-01-07",
                "week_a": {
                    "sunday": "Mother Jane", "monday": "Mother Jane", "tuesday": "Mother Jane",
                    "wednesday": "Sam", "thursday": "Sam", "friday": "Sam", "saturday": "Sam"
                },
                "week_b": {
                    "sunday": "Sam", "monday": "Sam", "tuesday": "Sam",
                    "wednesday": "Mother Jane", "thursday": "Mother Jane", "friday": "Mother Jane",
                    "saturday": "Mother Jane"
                }
            }],
            "overrides": [
                { "family_id": "fam-1", "date": "2024-01-09", "responsible_party": "Sam", "reason": "trip" }
            ],
            "events": [
                { "id": "ev-1", "date": "2024-01-08", "title": "Dentist", "start_time": "15:00" }
            ],
            "activities": [
                { "id": "swim", "name": "Swimming", "day_of_week": "monday", "start_time": "17:00" }
            ],
            "tasks": [
                {
                    "id": "dishes", "assigned_child_ids": ["kid-1"], "category": "household_chore",
                    "is_recurring": true, "recurring_days": ["monday", "tuesday"],
                    "created_by_party": "Jane"
                },
                {
                    "id": "math", "assigned_child_ids": ["kid-1"], "category": "homework",
                    "due_date": "2024-01-09"
                }
            ],
            "completed": [
                { "task_id": "math", "child_id": "kid-1", "completion_date": "2024-01-09" }
            ]
        }))
        .unwrap();
        snapshot.for_family("fam-1")
    }

    #[test]
    fn test_responsible_party_and_week_view() {
        let engine = ScheduleEngine::default();
        let family = family();

        assert_eq!(engine.responsible_party(&family, d("2024-01-08")).as_deref(), Some("Jane"));
        assert_eq!(engine.responsible_party(&family, d("2024-01-09")).as_deref(), Some("Sam"));

        let week = engine.week_view(&family, d("2024-01-10")).unwrap();
        assert_eq!(week.len(), 7);
        assert!(week[2].overridden);
    }

    #[test]
    fn test_calendar_uses_cache() {
        let engine = ScheduleEngine::default();
        let family = family();
        let range = DateRange::parse("2024-01-07", "2024-01-13").unwrap();

        let items = engine.calendar(&family, range, &CalendarFilter::default()).unwrap();
        let again = engine.calendar(&family, range, &CalendarFilter::default()).unwrap();

        assert_eq!(items, again);
        assert_eq!(items.iter().filter(|i| i.kind == CalendarItemKind::Custody).count(), 7);
        let monday: Vec<_> = items
            .iter()
            .filter(|i| i.date == d("2024-01-08"))
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(monday, vec!["custody:2024-01-08", "ev-1", "swim:2024-01-08"]);
        assert_eq!(engine.cache().stats().hits, 1);
    }

    #[test]
    fn test_due_tasks_follow_custody() {
        let engine = ScheduleEngine::default();
        let family = family();

        // Monday: Jane on duty, her chore is due
        let monday = engine.due_tasks(&family, "kid-1", d("2024-01-08")).unwrap();
        assert_eq!(monday.len(), 1);

        // Tuesday: overridden to Sam, only homework is due
        let tuesday = engine.due_tasks(&family, "kid-1", d("2024-01-09")).unwrap();
        assert_eq!(tuesday.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["math"]);

        let progress = engine.task_progress(&family, "kid-1", d("2024-01-09")).unwrap();
        assert_eq!((progress.total, progress.completed), (1, 1));
    }

    #[test]
    fn test_weekly_scores_default_to_assigned_children() {
        let engine = ScheduleEngine::default();
        let mut family = family();
        family.tasks[0].assigned_child_ids.push("kid-2".to_string());
        family.tasks[1].points = Some(3);

        let scores = engine.weekly_scores(&family, d("2024-01-12"), &[]);

        let rows: Vec<_> = scores.iter().map(|s| (s.child_id.as_str(), s.points)).collect();
        assert_eq!(rows, vec![("kid-1", 3), ("kid-2", 0)]);
    }
}
