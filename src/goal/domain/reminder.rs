//! Read model for the daily reminder.

use super::{GoalHierarchy, GoalId, TaskId, TaskPriority, progress};
use chrono::NaiveDate;
use serde::Serialize;

/// Why a task appears in a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// The due date has passed and the task is still open.
    Overdue,
    /// The task is due on the digest date.
    DueToday,
}

/// One open task worth reminding about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderEntry {
    /// Goal that owns the task.
    pub goal_id: GoalId,
    /// Hierarchical path of the owning goal.
    pub goal_path: String,
    /// Task identifier.
    pub task_id: TaskId,
    /// Task title.
    pub task_title: String,
    /// Task priority.
    pub priority: TaskPriority,
    /// Task due date.
    pub due_date: NaiveDate,
    /// Reason for the reminder.
    pub kind: ReminderKind,
}

/// Open tasks that are overdue or due on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderDigest {
    date: NaiveDate,
    entries: Vec<ReminderEntry>,
}

impl ReminderDigest {
    /// Collects overdue tasks (oldest first) followed by tasks due on
    /// `today`, both in hierarchy order within the same due date.
    #[must_use]
    pub fn collect(hierarchy: &GoalHierarchy, today: NaiveDate) -> Self {
        let mut entries = Vec::new();
        for goal in hierarchy.flattened() {
            for task in goal.tasks().iter().filter(|task| !task.is_completed()) {
                let Some(due_date) = task.due_date() else {
                    continue;
                };
                let kind = if due_date < today {
                    ReminderKind::Overdue
                } else if due_date == today {
                    ReminderKind::DueToday
                } else {
                    continue;
                };
                entries.push(ReminderEntry {
                    goal_id: goal.id(),
                    goal_path: progress::hierarchical_path(hierarchy, goal.id())
                        .unwrap_or_else(|| goal.title().to_owned()),
                    task_id: task.id(),
                    task_title: task.title().to_owned(),
                    priority: task.priority(),
                    due_date,
                    kind,
                });
            }
        }
        entries.sort_by_key(|entry| (entry.kind, entry.due_date));
        Self {
            date: today,
            entries,
        }
    }

    /// Day the digest was collected for.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// All entries, overdue first.
    #[must_use]
    pub fn entries(&self) -> &[ReminderEntry] {
        &self.entries
    }

    /// Whether there is nothing to remind about.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with the given kind.
    pub fn of_kind(&self, kind: ReminderKind) -> impl Iterator<Item = &ReminderEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }
}
