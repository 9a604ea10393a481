//! Service layer owning the in-memory goal hierarchy.
//!
//! [`GoalTrackerService`] is the single owner of the working hierarchy. Every
//! mutation goes through `&mut self` and touches the affected goals'
//! modification timestamps; persistence exchanges the whole hierarchy with a
//! [`GoalStore`].

use super::GoalStatistics;
use crate::config::TrackerConfig;
use crate::goal::{
    domain::{
        Goal, GoalDomainError, GoalHierarchy, GoalId, GoalType, ReminderDigest, Task, TaskId,
        TaskPriority, TaskStatus, progress,
    },
    ports::{GoalStore, GoalStoreError, LoadWarning},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Changes to apply to an existing goal. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    title: Option<String>,
    description: Option<Option<String>>,
    notes: Option<String>,
    goal_type: Option<GoalType>,
    target_date: Option<Option<NaiveDate>>,
    completed: Option<bool>,
}

impl GoalPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Replaces the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Changes the goal type.
    #[must_use]
    pub const fn with_goal_type(mut self, goal_type: GoalType) -> Self {
        self.goal_type = Some(goal_type);
        self
    }

    /// Sets or clears the target date.
    #[must_use]
    pub const fn with_target_date(mut self, target_date: Option<NaiveDate>) -> Self {
        self.target_date = Some(target_date);
        self
    }

    /// Sets the completed flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Request payload for adding a task to a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
}

impl NewTask {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            due_date: None,
            start_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// Changes to apply to an existing task. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<Option<String>>,
    priority: Option<TaskPriority>,
    status: Option<TaskStatus>,
    due_date: Option<Option<NaiveDate>>,
    start_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Changes the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Changes the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets or clears the start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: Option<NaiveDate>) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// Service-level errors for goal tracking operations.
#[derive(Debug, Error)]
pub enum GoalTrackerError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] GoalDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] GoalStoreError),
}

/// Result type for goal tracker operations.
pub type GoalTrackerResult<T> = Result<T, GoalTrackerError>;

/// Goal and task repository backed by a whole-hierarchy store.
pub struct GoalTrackerService<S, C>
where
    S: GoalStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: TrackerConfig,
    hierarchy: GoalHierarchy,
}

impl<S, C> GoalTrackerService<S, C>
where
    S: GoalStore,
    C: Clock + Send + Sync,
{
    /// Creates an empty tracker with the default configuration.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_config(store, clock, TrackerConfig::default())
    }

    /// Creates an empty tracker with an explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<S>, clock: Arc<C>, config: TrackerConfig) -> Self {
        Self {
            store,
            clock,
            config,
            hierarchy: GoalHierarchy::new(),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Returns the working hierarchy.
    #[must_use]
    pub const fn hierarchy(&self) -> &GoalHierarchy {
        &self.hierarchy
    }

    /// Local calendar date according to the service clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    /// Creates a root goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the title is blank.
    pub fn create_goal(
        &mut self,
        title: impl Into<String>,
        goal_type: GoalType,
        target_date: Option<NaiveDate>,
    ) -> GoalTrackerResult<GoalId> {
        self.create_hierarchical_goal(title, goal_type, target_date, None)
    }

    /// Creates a goal under `parent`, or as a root when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the title is blank, the
    /// parent is unknown, or strict nesting rejects the goal type.
    pub fn create_hierarchical_goal(
        &mut self,
        title: impl Into<String>,
        goal_type: GoalType,
        target_date: Option<NaiveDate>,
        parent: Option<GoalId>,
    ) -> GoalTrackerResult<GoalId> {
        if let Some(parent_id) = parent {
            self.check_nesting(parent_id, goal_type)?;
        }
        let goal = Goal::new(title, goal_type, target_date, &*self.clock)?;
        let id = match parent {
            Some(parent_id) => {
                let id = self.hierarchy.insert_child(parent_id, goal)?;
                self.touch(parent_id);
                id
            }
            None => self.hierarchy.insert_root(goal)?,
        };
        debug!(goal_id = %id, goal_type = %goal_type, parent = ?parent, "created goal");
        Ok(id)
    }

    /// Root goals in order.
    #[must_use]
    pub fn root_goals(&self) -> Vec<&Goal> {
        self.hierarchy.roots().collect()
    }

    /// Every goal in pre-order.
    #[must_use]
    pub fn all_goals_flattened(&self) -> Vec<&Goal> {
        self.hierarchy.flattened()
    }

    /// Looks up a goal at any depth.
    #[must_use]
    pub fn find_goal_by_id(&self, id: GoalId) -> Option<&Goal> {
        self.hierarchy.get(id)
    }

    /// Looks up a task in any goal.
    #[must_use]
    pub fn find_task_by_id(&self, id: TaskId) -> Option<&Task> {
        self.hierarchy.find_task(id).map(|(_, task)| task)
    }

    /// Applies a patch to a goal.
    ///
    /// The patch is validated before anything changes, so a rejected patch
    /// leaves the goal untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the goal is unknown, the new
    /// title is blank, or strict nesting rejects the new goal type.
    pub fn update_goal(&mut self, id: GoalId, patch: GoalPatch) -> GoalTrackerResult<()> {
        if let Some(goal_type) = patch.goal_type {
            self.check_retype(id, goal_type)?;
        }
        if patch
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(GoalDomainError::EmptyGoalTitle.into());
        }

        let clock = &*self.clock;
        let goal = self
            .hierarchy
            .get_mut(id)
            .ok_or(GoalDomainError::GoalNotFound(id))?;
        if let Some(title) = patch.title {
            goal.set_title(title, clock)?;
        }
        if let Some(description) = patch.description {
            goal.set_description(description, clock);
        }
        if let Some(notes) = patch.notes {
            goal.set_notes(notes, clock);
        }
        if let Some(goal_type) = patch.goal_type {
            goal.set_goal_type(goal_type, clock);
        }
        if let Some(target_date) = patch.target_date {
            goal.set_target_date(target_date, clock);
        }
        if let Some(completed) = patch.completed {
            goal.set_completed(completed, clock);
        }
        Ok(())
    }

    /// Re-parents a goal; `None` makes it a root.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when either goal is unknown, the
    /// move would create a cycle, or strict nesting rejects it.
    pub fn move_goal(&mut self, id: GoalId, new_parent: Option<GoalId>) -> GoalTrackerResult<()> {
        let goal = self
            .hierarchy
            .get(id)
            .ok_or(GoalDomainError::GoalNotFound(id))?;
        let (old_parent, goal_type) = (goal.parent(), goal.goal_type());
        if old_parent == new_parent {
            return Ok(());
        }
        match new_parent {
            Some(parent_id) => {
                self.check_nesting(parent_id, goal_type)?;
                self.hierarchy.add_child_goal(parent_id, id)?;
                self.touch(parent_id);
            }
            None => {
                if let Some(parent_id) = old_parent {
                    self.hierarchy.remove_child_goal(parent_id, id)?;
                }
            }
        }
        if let Some(parent_id) = old_parent {
            self.touch(parent_id);
        }
        self.touch(id);
        Ok(())
    }

    /// Adds a task to a goal and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the goal is unknown or the
    /// task title is blank.
    pub fn add_task(&mut self, goal_id: GoalId, request: NewTask) -> GoalTrackerResult<TaskId> {
        let mut task = Task::new(request.title, request.description, request.due_date)?;
        task.set_priority(request.priority);
        task.set_start_date(request.start_date);
        let task_id = task.id();

        let goal = self
            .hierarchy
            .get_mut(goal_id)
            .ok_or(GoalDomainError::GoalNotFound(goal_id))?;
        goal.add_task(task, &*self.clock);
        debug!(goal_id = %goal_id, task_id = %task_id, "added task");
        Ok(task_id)
    }

    /// Removes a task from a goal and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the goal is unknown or does
    /// not own the task.
    pub fn remove_task(&mut self, goal_id: GoalId, task_id: TaskId) -> GoalTrackerResult<Task> {
        let goal = self
            .hierarchy
            .get_mut(goal_id)
            .ok_or(GoalDomainError::GoalNotFound(goal_id))?;
        let task = goal
            .remove_task(task_id, &*self.clock)
            .ok_or(GoalDomainError::TaskNotFound(task_id))?;
        Ok(task)
    }

    /// Moves a task to another goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the task or target goal is
    /// unknown.
    pub fn move_task(&mut self, task_id: TaskId, to: GoalId) -> GoalTrackerResult<()> {
        let from = self.hierarchy.move_task(task_id, to)?;
        if from != to {
            self.touch(from);
            self.touch(to);
        }
        Ok(())
    }

    /// Changes a task's status.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the task is unknown.
    pub fn set_task_status(&mut self, task_id: TaskId, status: TaskStatus) -> GoalTrackerResult<()> {
        self.update_task(task_id, TaskPatch::new().with_status(status))
    }

    /// Applies a patch to a task and touches its owning goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the task is unknown or the
    /// new title is blank; a rejected patch changes nothing.
    pub fn update_task(&mut self, task_id: TaskId, patch: TaskPatch) -> GoalTrackerResult<()> {
        if patch
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(GoalDomainError::EmptyTaskTitle.into());
        }
        let owner = self
            .hierarchy
            .task_owner(task_id)
            .ok_or(GoalDomainError::TaskNotFound(task_id))?;

        let clock = &*self.clock;
        let goal = self
            .hierarchy
            .get_mut(owner)
            .ok_or(GoalDomainError::GoalNotFound(owner))?;
        let task = goal
            .task_mut(task_id)
            .ok_or(GoalDomainError::TaskNotFound(task_id))?;
        if let Some(title) = patch.title {
            task.set_title(title)?;
        }
        if let Some(description) = patch.description {
            task.set_description(description);
        }
        if let Some(priority) = patch.priority {
            task.set_priority(priority);
        }
        if let Some(status) = patch.status {
            task.set_status(status, clock);
        }
        if let Some(due_date) = patch.due_date {
            task.set_due_date(due_date);
        }
        if let Some(start_date) = patch.start_date {
            task.set_start_date(start_date);
        }
        goal.touch(clock);
        Ok(())
    }

    /// Deletes a goal together with its sub-goals and all their tasks,
    /// returning the removed goals in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Domain`] when the goal is unknown.
    pub fn delete_goal_hierarchically(&mut self, id: GoalId) -> GoalTrackerResult<Vec<Goal>> {
        let parent = self.hierarchy.get(id).and_then(Goal::parent);
        let removed = self.hierarchy.remove_subtree(id)?;
        if let Some(parent_id) = parent {
            self.touch(parent_id);
        }
        info!(goal_id = %id, removed = removed.len(), "deleted goal subtree");
        Ok(removed)
    }

    /// Flat progress over a goal's own tasks.
    #[must_use]
    pub fn progress(&self, id: GoalId) -> Option<f64> {
        self.hierarchy.get(id).map(Goal::progress)
    }

    /// Equal-weight progress over a goal and its sub-goals.
    #[must_use]
    pub fn hierarchical_progress(&self, id: GoalId) -> Option<f64> {
        progress::hierarchical_progress(&self.hierarchy, id)
    }

    /// Tasks of a goal and its descendants.
    #[must_use]
    pub fn all_tasks(&self, id: GoalId) -> Option<Vec<&Task>> {
        progress::all_tasks(&self.hierarchy, id)
    }

    /// Ancestor titles joined root first.
    #[must_use]
    pub fn hierarchical_path(&self, id: GoalId) -> Option<String> {
        progress::hierarchical_path(&self.hierarchy, id)
    }

    /// Counts over the whole hierarchy as of today.
    #[must_use]
    pub fn statistics(&self) -> GoalStatistics {
        GoalStatistics::collect(&self.hierarchy, self.today())
    }

    /// Tasks due on `date`, in hierarchy order.
    #[must_use]
    pub fn tasks_due_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks_due_between(date, date)
    }

    /// Tasks due within `from..=to`, in hierarchy order.
    #[must_use]
    pub fn tasks_due_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Task> {
        self.hierarchy
            .flattened()
            .into_iter()
            .flat_map(Goal::tasks)
            .filter(|task| task.due_date().is_some_and(|due| from <= due && due <= to))
            .collect()
    }

    /// Goals whose title, description or notes contain `query`, ignoring
    /// case. A blank query matches every goal.
    #[must_use]
    pub fn search_goals(&self, query: &str) -> Vec<&Goal> {
        let needle = query.trim().to_lowercase();
        self.hierarchy
            .flattened()
            .into_iter()
            .filter(|goal| {
                needle.is_empty()
                    || goal.title().to_lowercase().contains(&needle)
                    || goal
                        .description()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                    || goal.notes().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Overdue and due-today open tasks as of today.
    #[must_use]
    pub fn reminder_digest(&self) -> ReminderDigest {
        ReminderDigest::collect(&self.hierarchy, self.today())
    }

    /// Writes the whole hierarchy to the store.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Store`] when the store rejects the write.
    pub async fn save_goals_to_file(&self) -> GoalTrackerResult<()> {
        self.store.save(&self.hierarchy).await?;
        info!(goals = self.hierarchy.len(), "saved goals");
        Ok(())
    }

    /// Replaces the working hierarchy with the stored one and returns the
    /// records the store skipped or adjusted.
    ///
    /// On error the working hierarchy is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GoalTrackerError::Store`] when the store cannot be read.
    pub async fn load_goals_from_file(&mut self) -> GoalTrackerResult<Vec<LoadWarning>> {
        let loaded = self.store.load().await?;
        self.hierarchy = loaded.hierarchy;
        info!(
            goals = self.hierarchy.len(),
            warnings = loaded.warnings.len(),
            "loaded goals"
        );
        Ok(loaded.warnings)
    }

    fn check_nesting(&self, parent: GoalId, child_type: GoalType) -> GoalTrackerResult<()> {
        let parent_goal = self
            .hierarchy
            .get(parent)
            .ok_or(GoalDomainError::GoalNotFound(parent))?;
        if self.config.strict_nesting && !parent_goal.can_have_child(child_type) {
            return Err(GoalDomainError::InvalidNesting {
                parent: parent_goal.goal_type(),
                child: child_type,
            }
            .into());
        }
        Ok(())
    }

    /// Checks a type change against the goal's parent and children.
    fn check_retype(&self, id: GoalId, goal_type: GoalType) -> GoalTrackerResult<()> {
        let goal = self
            .hierarchy
            .get(id)
            .ok_or(GoalDomainError::GoalNotFound(id))?;
        if !self.config.strict_nesting {
            return Ok(());
        }
        if let Some(parent_id) = goal.parent() {
            self.check_nesting(parent_id, goal_type)?;
        }
        if let Some(child) = self
            .hierarchy
            .children(id)
            .find(|child| !goal_type.can_have_child(child.goal_type()))
        {
            return Err(GoalDomainError::InvalidNesting {
                parent: goal_type,
                child: child.goal_type(),
            }
            .into());
        }
        Ok(())
    }

    fn touch(&mut self, id: GoalId) {
        if let Some(goal) = self.hierarchy.get_mut(id) {
            goal.touch(&*self.clock);
        }
    }
}
