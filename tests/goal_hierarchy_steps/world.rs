//! Shared world state for goal hierarchy BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use goalpost::config::TrackerConfig;
use goalpost::goal::{
    adapters::memory::InMemoryGoalStore,
    domain::{GoalId, GoalType},
    services::{GoalTrackerError, GoalTrackerService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestGoalService = GoalTrackerService<InMemoryGoalStore, DefaultClock>;

/// Scenario world for goal hierarchy behaviour tests.
pub struct GoalWorld {
    pub service: TestGoalService,
    pub goals: HashMap<String, GoalId>,
    pub last_error: Option<GoalTrackerError>,
}

impl GoalWorld {
    /// Creates a world with an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: GoalTrackerService::new(
                Arc::new(InMemoryGoalStore::new()),
                Arc::new(DefaultClock),
            ),
            goals: HashMap::new(),
            last_error: None,
        }
    }

    /// Replaces the tracker with one that validates goal type nesting.
    pub fn enable_strict_nesting(&mut self) {
        self.service = GoalTrackerService::with_config(
            Arc::new(InMemoryGoalStore::new()),
            Arc::new(DefaultClock),
            TrackerConfig::default().with_strict_nesting(true),
        );
    }

    /// Looks up a goal created earlier in the scenario by title.
    ///
    /// # Errors
    ///
    /// Returns an error when no goal with the title was created.
    pub fn goal(&self, title: &str) -> Result<GoalId, eyre::Report> {
        self.goals
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no goal titled '{title}' in scenario world"))
    }
}

impl Default for GoalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> GoalWorld {
    GoalWorld::default()
}

/// Parses a goal type storage name from a step.
///
/// # Errors
///
/// Returns an error when the name is not a known goal type.
pub fn parse_goal_type(name: &str) -> Result<GoalType, eyre::Report> {
    GoalType::try_from(name).map_err(|err| eyre::eyre!("{err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
