//! Application services for goal tracking and reminders.

mod reminder;
mod statistics;
mod tracker;

pub use reminder::{DailyReminderScheduler, next_fire_after};
pub use statistics::GoalStatistics;
pub use tracker::{
    GoalPatch, GoalTrackerError, GoalTrackerResult, GoalTrackerService, NewTask, TaskPatch,
};
