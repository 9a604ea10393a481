//! Aggregate counts over the whole hierarchy.

use crate::goal::domain::{GoalHierarchy, GoalType, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Snapshot of goal and task counts used by dashboards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalStatistics {
    /// Goals at every depth.
    pub total_goals: usize,
    /// Goals flagged completed.
    pub completed_goals: usize,
    /// Tasks across every goal.
    pub total_tasks: usize,
    /// Tasks in `ToDo`.
    pub todo_tasks: usize,
    /// Tasks in `InProgress`.
    pub in_progress_tasks: usize,
    /// Tasks in `Done`.
    pub done_tasks: usize,
    /// Open tasks whose due date has passed.
    pub overdue_tasks: usize,
    /// Task counts per priority; every priority is present.
    pub tasks_by_priority: BTreeMap<TaskPriority, usize>,
    /// Goal counts per type; only types in use are present.
    pub goals_by_type: BTreeMap<GoalType, usize>,
}

impl GoalStatistics {
    /// Counts goals and tasks as of `today`.
    #[must_use]
    pub fn collect(hierarchy: &GoalHierarchy, today: NaiveDate) -> Self {
        let mut stats = Self {
            tasks_by_priority: TaskPriority::ALL.into_iter().map(|p| (p, 0)).collect(),
            ..Self::default()
        };

        for goal in hierarchy.flattened() {
            stats.total_goals += 1;
            if goal.is_completed() {
                stats.completed_goals += 1;
            }
            *stats.goals_by_type.entry(goal.goal_type()).or_default() += 1;

            for task in goal.tasks() {
                stats.total_tasks += 1;
                match task.status() {
                    TaskStatus::ToDo => stats.todo_tasks += 1,
                    TaskStatus::InProgress => stats.in_progress_tasks += 1,
                    TaskStatus::Done => stats.done_tasks += 1,
                }
                if task.is_overdue(today) {
                    stats.overdue_tasks += 1;
                }
                *stats.tasks_by_priority.entry(task.priority()).or_default() += 1;
            }
        }
        stats
    }

    /// Percentage of tasks that are done; `0.0` without tasks.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "percentages are reported as floating point"
    )]
    pub fn completion_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        100.0 * self.done_tasks as f64 / self.total_tasks as f64
    }
}
