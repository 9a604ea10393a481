//! Domain model for hierarchical goal tracking.
//!
//! Goals and tasks are plain entities; [`GoalHierarchy`] is the arena that
//! owns every goal and keeps parent and child links consistent, and
//! [`progress`] aggregates completion over it. [`ReminderDigest`] is the
//! read model handed to reminder notifiers. Nothing here touches storage.

mod error;
mod goal;
mod goal_type;
mod hierarchy;
mod ids;
pub mod progress;
mod reminder;
mod task;

pub use error::{
    GoalDomainError, ParseGoalTypeError, ParseTaskPriorityError, ParseTaskStatusError,
};
pub use goal::{Goal, PersistedGoalData};
pub use goal_type::{DEFAULT_HIERARCHY_LEVEL, GoalType};
pub use hierarchy::GoalHierarchy;
pub use ids::{GoalId, TaskId};
pub use reminder::{ReminderDigest, ReminderEntry, ReminderKind};
pub use task::{PersistedTaskData, Task, TaskPriority, TaskStatus};
