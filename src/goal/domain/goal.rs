//! Goal entity.
//!
//! A goal owns its tasks outright. Its parent and child links are handles
//! into a [`super::GoalHierarchy`] and can only be changed through it.

use super::{GoalDomainError, GoalId, GoalType, Task, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::Serialize;

/// A tracked objective, optionally decomposed into sub-goals and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    id: GoalId,
    title: String,
    description: Option<String>,
    goal_type: GoalType,
    target_date: Option<NaiveDate>,
    completed: bool,
    notes: String,
    last_modified: DateTime<Utc>,
    parent: Option<GoalId>,
    children: Vec<GoalId>,
    tasks: Vec<Task>,
}

/// Parameter object for reconstructing a persisted goal.
///
/// Links are not part of the payload; adapters rebuild them through the
/// hierarchy so both sides of every edge stay consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGoalData {
    /// Persisted goal identifier.
    pub id: GoalId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted goal type.
    pub goal_type: GoalType,
    /// Persisted target date, if any.
    pub target_date: Option<NaiveDate>,
    /// Persisted completed flag.
    pub completed: bool,
    /// Persisted free-form notes.
    pub notes: String,
    /// Persisted last modification timestamp.
    pub last_modified: DateTime<Utc>,
    /// Persisted tasks in display order.
    pub tasks: Vec<Task>,
}

impl Goal {
    /// Creates a parentless goal with no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::EmptyGoalTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        goal_type: GoalType,
        target_date: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Result<Self, GoalDomainError> {
        Ok(Self {
            id: GoalId::new(),
            title: validated_title(title)?,
            description: None,
            goal_type,
            target_date,
            completed: false,
            notes: String::new(),
            last_modified: clock.utc(),
            parent: None,
            children: Vec::new(),
            tasks: Vec::new(),
        })
    }

    /// Reconstructs a goal from persisted storage, detached from any
    /// hierarchy.
    #[must_use]
    pub fn from_persisted(data: PersistedGoalData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            goal_type: data.goal_type,
            target_date: data.target_date,
            completed: data.completed,
            notes: data.notes,
            last_modified: data.last_modified,
            parent: None,
            children: Vec::new(),
            tasks: data.tasks,
        }
    }

    /// Returns the goal identifier.
    #[must_use]
    pub const fn id(&self) -> GoalId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the goal type.
    #[must_use]
    pub const fn goal_type(&self) -> GoalType {
        self.goal_type
    }

    /// Returns the target date, if any.
    #[must_use]
    pub const fn target_date(&self) -> Option<NaiveDate> {
        self.target_date
    }

    /// Returns the completed flag.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Returns the parent goal handle, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<GoalId> {
        self.parent
    }

    /// Returns the child goal handles in order.
    #[must_use]
    pub fn children(&self) -> &[GoalId] {
        &self.children
    }

    /// Returns the directly owned tasks in order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether this goal has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the display depth derived from the goal type.
    #[must_use]
    pub fn hierarchy_level(&self) -> u8 {
        self.goal_type.hierarchy_level()
    }

    /// Whether a goal of `child_type` may be nested directly under this goal.
    #[must_use]
    pub fn can_have_child(&self, child_type: GoalType) -> bool {
        self.goal_type.can_have_child(child_type)
    }

    /// Flat completion percentage over the direct tasks only.
    ///
    /// Returns `0.0` when the goal has no tasks; sub-goal tasks are not
    /// counted.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "percentages are reported as floating point"
    )]
    pub fn progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let done = self.tasks.iter().filter(|task| task.is_completed()).count();
        100.0 * done as f64 / self.tasks.len() as f64
    }

    /// Returns a task owned by this goal.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns a mutable task owned by this goal.
    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Appends a task to this goal.
    pub fn add_task(&mut self, task: Task, clock: &impl Clock) {
        self.tasks.push(task);
        self.touch(clock);
    }

    /// Removes a task from this goal, returning it.
    ///
    /// Returns `None` and leaves the goal untouched when the task is not
    /// owned by this goal.
    pub fn remove_task(&mut self, id: TaskId, clock: &impl Clock) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id() == id)?;
        let task = self.tasks.remove(position);
        self.touch(clock);
        Some(task)
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::EmptyGoalTitle`] when the title is blank.
    pub fn set_title(
        &mut self,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), GoalDomainError> {
        self.title = validated_title(title)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description; blank text clears it.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description.filter(|text| !text.trim().is_empty());
        self.touch(clock);
    }

    /// Replaces the notes.
    pub fn set_notes(&mut self, notes: impl Into<String>, clock: &impl Clock) {
        self.notes = notes.into();
        self.touch(clock);
    }

    /// Sets or clears the target date.
    pub fn set_target_date(&mut self, target_date: Option<NaiveDate>, clock: &impl Clock) {
        self.target_date = target_date;
        self.touch(clock);
    }

    /// Sets the completed flag.
    pub fn set_completed(&mut self, completed: bool, clock: &impl Clock) {
        self.completed = completed;
        self.touch(clock);
    }

    /// Changes the goal type. Existing links are not revalidated.
    pub fn set_goal_type(&mut self, goal_type: GoalType, clock: &impl Clock) {
        self.goal_type = goal_type;
        self.touch(clock);
    }

    /// Updates the last modification timestamp to the current clock time.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.last_modified = clock.utc();
    }

    pub(super) fn clear_links(&mut self) {
        self.parent = None;
        self.children.clear();
    }

    pub(super) const fn set_parent(&mut self, parent: Option<GoalId>) {
        self.parent = parent;
    }

    pub(super) fn push_child(&mut self, child: GoalId) {
        self.children.push(child);
    }

    pub(super) fn drop_child(&mut self, child: GoalId) -> bool {
        let before = self.children.len();
        self.children.retain(|id| *id != child);
        self.children.len() != before
    }

    pub(super) fn take_task(&mut self, id: TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id() == id)?;
        Some(self.tasks.remove(position))
    }

    pub(super) fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }
}

fn validated_title(title: impl Into<String>) -> Result<String, GoalDomainError> {
    let raw = title.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GoalDomainError::EmptyGoalTitle);
    }
    Ok(trimmed.to_owned())
}
