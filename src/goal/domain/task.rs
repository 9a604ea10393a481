//! Task entity and its status and priority types.

use super::{GoalDomainError, ParseTaskPriorityError, ParseTaskStatusError, TaskId};
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work status of a task.
///
/// Every transition is permitted and `Done` is revocable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Work has not started.
    ToDo,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "TO_DO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "TO_DO" | "TODO" => Ok(Self::ToDo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Urgency of a task.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Should be handled soon.
    High,
    /// Needs attention now.
    Urgent,
}

impl TaskPriority {
    /// Every priority from lowest to highest.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| ParseTaskPriorityError(value.to_owned()))
    }
}

/// Atomic unit of work owned by exactly one goal.
///
/// Tasks serialize but cannot be deserialized directly; persisted data is
/// rebuilt through [`Task::from_persisted`], which keeps the completion date
/// consistent with the status.
///
/// ```compile_fail
/// fn deserializable<T: serde::de::DeserializeOwned>() {}
/// deserializable::<goalpost::goal::domain::Task>();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    completed_date: Option<NaiveDate>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted start date, if any.
    pub start_date: Option<NaiveDate>,
    /// Persisted completion date; ignored unless the status is `Done`.
    pub completed_date: Option<NaiveDate>,
}

impl Task {
    /// Creates an open task with medium priority.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::EmptyTaskTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, GoalDomainError> {
        Ok(Self {
            id: TaskId::new(),
            title: validated_title(title)?,
            description: description.filter(|text| !text.trim().is_empty()),
            priority: TaskPriority::default(),
            status: TaskStatus::ToDo,
            due_date,
            start_date: None,
            completed_date: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let completed_date = if data.status == TaskStatus::Done {
            data.completed_date
        } else {
            None
        };
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            start_date: data.start_date,
            completed_date,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Whether the task is done. Always agrees with [`Task::status`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the date the task was marked done, if it is done.
    #[must_use]
    pub const fn completed_date(&self) -> Option<NaiveDate> {
        self.completed_date
    }

    /// Whether the task is open and its due date lies before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < today)
    }

    /// Sets the status. `Done` stamps the completion date with the clock's
    /// local date; any other status clears it.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.completed_date = match status {
            TaskStatus::Done => Some(clock.local().date_naive()),
            TaskStatus::ToDo | TaskStatus::InProgress => None,
        };
    }

    /// Sets the priority.
    pub const fn set_priority(&mut self, priority: TaskPriority) {
        self.priority = priority;
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::EmptyTaskTitle`] when the title is blank.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), GoalDomainError> {
        self.title = validated_title(title)?;
        Ok(())
    }

    /// Replaces the description; blank text clears it.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|text| !text.trim().is_empty());
    }

    /// Sets or clears the due date.
    pub const fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
    }

    /// Sets or clears the start date.
    pub const fn set_start_date(&mut self, start_date: Option<NaiveDate>) {
        self.start_date = start_date;
    }
}

fn validated_title(title: impl Into<String>) -> Result<String, GoalDomainError> {
    let raw = title.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GoalDomainError::EmptyTaskTitle);
    }
    Ok(trimmed.to_owned())
}
