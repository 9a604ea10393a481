//! Error types for goal domain validation and parsing.

use super::{GoalId, GoalType, TaskId};
use thiserror::Error;

/// Errors returned by goal, task and hierarchy operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GoalDomainError {
    /// The goal title is empty after trimming.
    #[error("goal title must not be empty")]
    EmptyGoalTitle,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// No goal with the identifier exists in the hierarchy.
    #[error("goal not found: {0}")]
    GoalNotFound(GoalId),

    /// No task with the identifier exists in the hierarchy.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A goal with the identifier is already in the hierarchy.
    #[error("duplicate goal identifier: {0}")]
    DuplicateGoal(GoalId),

    /// A goal was offered as its own child.
    #[error("goal {0} cannot be its own child")]
    SelfParent(GoalId),

    /// Attaching the child would make a goal its own ancestor.
    #[error("goal {child} is an ancestor of {parent}; attaching it would create a cycle")]
    CycleDetected {
        /// Proposed parent goal.
        parent: GoalId,
        /// Proposed child goal.
        child: GoalId,
    },

    /// The goal is not a direct child of the given parent.
    #[error("goal {child} is not a child of {parent}")]
    NotAChild {
        /// Supposed parent goal.
        parent: GoalId,
        /// Goal that was expected in the child list.
        child: GoalId,
    },

    /// The parent goal type does not accept the child goal type.
    #[error("a {parent} goal cannot contain a {child} goal")]
    InvalidNesting {
        /// Type of the parent goal.
        parent: GoalType,
        /// Type of the rejected child goal.
        child: GoalType,
    },
}

/// Error returned while parsing goal types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown goal type: {0}")]
pub struct ParseGoalTypeError(pub String);

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
