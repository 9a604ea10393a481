//! In-memory goal store for tests and embedding.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::goal::{
    domain::GoalHierarchy,
    ports::{GoalStore, GoalStoreError, GoalStoreResult, LoadedGoals},
};

/// Thread-safe in-memory goal store holding one saved snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGoalStore {
    state: Arc<RwLock<Option<GoalHierarchy>>>,
}

impl InMemoryGoalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a saved hierarchy.
    #[must_use]
    pub fn with_snapshot(hierarchy: GoalHierarchy) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(hierarchy))),
        }
    }

    /// Whether anything has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`GoalStoreError::Persistence`] when the lock is poisoned.
    pub fn has_snapshot(&self) -> GoalStoreResult<bool> {
        let state = self.state.read().map_err(|err| {
            GoalStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.is_some())
    }
}

#[async_trait]
impl GoalStore for InMemoryGoalStore {
    async fn save(&self, goals: &GoalHierarchy) -> GoalStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            GoalStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        *state = Some(goals.clone());
        Ok(())
    }

    async fn load(&self) -> GoalStoreResult<LoadedGoals> {
        let state = self.state.read().map_err(|err| {
            GoalStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(LoadedGoals::clean(state.clone().unwrap_or_default()))
    }
}
