//! Shared test helpers for in-memory store integration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use goalpost::goal::{
    adapters::memory::InMemoryGoalStore,
    domain::{GoalId, GoalType},
    services::{GoalTrackerResult, GoalTrackerService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used across the in-memory suites.
pub type TestService = GoalTrackerService<InMemoryGoalStore, DefaultClock>;

/// Provides a fresh in-memory store.
#[fixture]
pub fn store() -> Arc<InMemoryGoalStore> {
    Arc::new(InMemoryGoalStore::new())
}

/// Provides a tracker backed by its own in-memory store.
#[fixture]
pub fn service(store: Arc<InMemoryGoalStore>) -> TestService {
    GoalTrackerService::new(store, Arc::new(DefaultClock))
}

/// Builds a calendar date, panicking on invalid input.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Identifiers of a `long term > year > month` chain.
pub struct Chain {
    pub long_term: GoalId,
    pub year: GoalId,
    pub month: GoalId,
}

/// Creates a three-level chain titled `Vision > Plan > Sprint`.
///
/// # Errors
///
/// Returns an error if the service rejects any of the goals.
pub fn build_chain(service: &mut TestService) -> GoalTrackerResult<Chain> {
    let long_term = service.create_goal("Vision", GoalType::LongTerm, Some(date(2030, 1, 1)))?;
    let year =
        service.create_hierarchical_goal("Plan", GoalType::Yearly, None, Some(long_term))?;
    let month =
        service.create_hierarchical_goal("Sprint", GoalType::Monthly, None, Some(year))?;
    Ok(Chain {
        long_term,
        year,
        month,
    })
}
