//! Port contracts for goal tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by goal services.

pub mod notifier;
pub mod store;

pub use notifier::{NotifierError, ReminderNotifier};
pub use store::{GoalStore, GoalStoreError, GoalStoreResult, LoadWarning, LoadedGoals, Sheet};

#[cfg(test)]
pub use store::MockGoalStore;
