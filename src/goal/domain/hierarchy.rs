//! Arena holding every goal and the links between them.
//!
//! Goals refer to each other by [`GoalId`] handles. Every link change goes
//! through this type so that a child's `parent` and its parent's `children`
//! always agree, every goal is reachable from exactly one root, and no goal
//! is its own ancestor.

use super::{Goal, GoalDomainError, GoalId, Task, TaskId};
use std::collections::HashMap;

/// Forest of goals keyed by identifier, with ordered roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalHierarchy {
    goals: HashMap<GoalId, Goal>,
    roots: Vec<GoalId>,
}

impl GoalHierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of goals at every depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Whether the hierarchy holds no goals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Removes every goal.
    pub fn clear(&mut self) {
        self.goals.clear();
        self.roots.clear();
    }

    /// Returns a goal by identifier.
    #[must_use]
    pub fn get(&self, id: GoalId) -> Option<&Goal> {
        self.goals.get(&id)
    }

    /// Returns a mutable goal by identifier.
    ///
    /// Links cannot be changed through the returned reference.
    pub fn get_mut(&mut self, id: GoalId) -> Option<&mut Goal> {
        self.goals.get_mut(&id)
    }

    /// Whether the hierarchy holds a goal with the identifier.
    #[must_use]
    pub fn contains(&self, id: GoalId) -> bool {
        self.goals.contains_key(&id)
    }

    /// Identifiers of the root goals in order.
    #[must_use]
    pub fn root_ids(&self) -> &[GoalId] {
        &self.roots
    }

    /// Root goals in order.
    pub fn roots(&self) -> impl Iterator<Item = &Goal> {
        self.roots.iter().filter_map(|id| self.goals.get(id))
    }

    /// Direct children of a goal in order; empty for unknown goals.
    pub fn children(&self, id: GoalId) -> impl Iterator<Item = &Goal> {
        self.goals
            .get(&id)
            .map(Goal::children)
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.goals.get(child))
    }

    /// Every goal in pre-order, walking each root in turn.
    #[must_use]
    pub fn flattened(&self) -> Vec<&Goal> {
        let mut out = Vec::with_capacity(self.goals.len());
        for root in &self.roots {
            self.collect_preorder(*root, &mut out);
        }
        out
    }

    /// A goal and its descendants in pre-order; empty for unknown goals.
    #[must_use]
    pub fn subtree(&self, id: GoalId) -> Vec<&Goal> {
        let mut out = Vec::new();
        self.collect_preorder(id, &mut out);
        out
    }

    fn collect_preorder<'a>(&'a self, id: GoalId, out: &mut Vec<&'a Goal>) {
        let Some(goal) = self.goals.get(&id) else {
            return;
        };
        out.push(goal);
        for child in goal.children() {
            self.collect_preorder(*child, out);
        }
    }

    /// Ancestors of a goal, nearest parent first.
    #[must_use]
    pub fn ancestors(&self, id: GoalId) -> Vec<&Goal> {
        let mut out = Vec::new();
        let mut cursor = self.goals.get(&id).and_then(Goal::parent);
        while let Some(parent_id) = cursor {
            let Some(parent) = self.goals.get(&parent_id) else {
                break;
            };
            out.push(parent);
            cursor = parent.parent();
        }
        out
    }

    /// Whether `id` lies strictly below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, id: GoalId, ancestor: GoalId) -> bool {
        self.ancestors(id).iter().any(|goal| goal.id() == ancestor)
    }

    /// Inserts a goal as a new root and returns its identifier.
    ///
    /// Any links the goal carries from elsewhere are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::DuplicateGoal`] when a goal with the same
    /// identifier is already present.
    pub fn insert_root(&mut self, mut goal: Goal) -> Result<GoalId, GoalDomainError> {
        let id = goal.id();
        if self.goals.contains_key(&id) {
            return Err(GoalDomainError::DuplicateGoal(id));
        }
        goal.clear_links();
        self.goals.insert(id, goal);
        self.roots.push(id);
        Ok(id)
    }

    /// Inserts a goal directly under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::GoalNotFound`] when the parent is unknown
    /// or [`GoalDomainError::DuplicateGoal`] when the identifier is taken;
    /// the goal is not inserted in either case.
    pub fn insert_child(&mut self, parent: GoalId, goal: Goal) -> Result<GoalId, GoalDomainError> {
        self.require(parent)?;
        let id = self.insert_root(goal)?;
        self.add_child_goal(parent, id)?;
        Ok(id)
    }

    /// Makes `child` a direct child of `parent`.
    ///
    /// The child is first detached from its previous parent, or from the
    /// root list, so ownership moves rather than being duplicated. Adding an
    /// existing child again changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::GoalNotFound`] for unknown goals,
    /// [`GoalDomainError::SelfParent`] when both are the same goal, or
    /// [`GoalDomainError::CycleDetected`] when `parent` lies below `child`.
    pub fn add_child_goal(&mut self, parent: GoalId, child: GoalId) -> Result<(), GoalDomainError> {
        self.require(parent)?;
        let current_parent = self.require(child)?.parent();
        if parent == child {
            return Err(GoalDomainError::SelfParent(child));
        }
        if current_parent == Some(parent) {
            return Ok(());
        }
        if self.is_descendant_of(parent, child) {
            return Err(GoalDomainError::CycleDetected { parent, child });
        }

        self.detach(child);
        if let Some(goal) = self.goals.get_mut(&parent) {
            goal.push_child(child);
        }
        if let Some(goal) = self.goals.get_mut(&child) {
            goal.set_parent(Some(parent));
        }
        Ok(())
    }

    /// Removes `child` from `parent` and clears its parent link.
    ///
    /// The detached goal becomes a root so it stays addressable; delete it
    /// with [`GoalHierarchy::remove_subtree`] to discard it.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::GoalNotFound`] for unknown goals or
    /// [`GoalDomainError::NotAChild`] when `child` is not a direct child of
    /// `parent`.
    pub fn remove_child_goal(
        &mut self,
        parent: GoalId,
        child: GoalId,
    ) -> Result<(), GoalDomainError> {
        self.require(parent)?;
        if self.require(child)?.parent() != Some(parent) {
            return Err(GoalDomainError::NotAChild { parent, child });
        }
        self.detach(child);
        self.roots.push(child);
        Ok(())
    }

    /// Detaches a goal and removes it together with all of its descendants
    /// and their tasks. Returns the removed goals in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::GoalNotFound`] when the goal is unknown.
    pub fn remove_subtree(&mut self, id: GoalId) -> Result<Vec<Goal>, GoalDomainError> {
        self.require(id)?;
        let doomed: Vec<GoalId> = self.subtree(id).iter().map(|goal| goal.id()).collect();
        self.detach(id);
        Ok(doomed
            .into_iter()
            .filter_map(|goal_id| self.goals.remove(&goal_id))
            .collect())
    }

    /// Finds a task anywhere in the hierarchy together with its owning goal.
    #[must_use]
    pub fn find_task(&self, id: TaskId) -> Option<(&Goal, &Task)> {
        self.flattened()
            .into_iter()
            .find_map(|goal| goal.task(id).map(|task| (goal, task)))
    }

    /// Identifier of the goal that owns a task.
    #[must_use]
    pub fn task_owner(&self, id: TaskId) -> Option<GoalId> {
        self.find_task(id).map(|(goal, _)| goal.id())
    }

    /// Moves a task to another goal, appending it to that goal's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GoalDomainError::TaskNotFound`] when no goal owns the task or
    /// [`GoalDomainError::GoalNotFound`] when the target goal is unknown.
    pub fn move_task(&mut self, task: TaskId, to: GoalId) -> Result<GoalId, GoalDomainError> {
        self.require(to)?;
        let from = self
            .task_owner(task)
            .ok_or(GoalDomainError::TaskNotFound(task))?;
        if from == to {
            return Ok(from);
        }
        let moved = self
            .goals
            .get_mut(&from)
            .and_then(|goal| goal.take_task(task))
            .ok_or(GoalDomainError::TaskNotFound(task))?;
        if let Some(goal) = self.goals.get_mut(&to) {
            goal.push_task(moved);
        }
        Ok(from)
    }

    fn require(&self, id: GoalId) -> Result<&Goal, GoalDomainError> {
        self.goals.get(&id).ok_or(GoalDomainError::GoalNotFound(id))
    }

    /// Unlinks a goal from its parent or from the root list.
    fn detach(&mut self, id: GoalId) {
        let parent = self.goals.get(&id).and_then(Goal::parent);
        match parent {
            Some(parent_id) => {
                if let Some(parent_goal) = self.goals.get_mut(&parent_id) {
                    parent_goal.drop_child(id);
                }
                if let Some(goal) = self.goals.get_mut(&id) {
                    goal.set_parent(None);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }
}
