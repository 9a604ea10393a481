//! Store port for whole-hierarchy persistence.
//!
//! Stores always exchange the complete hierarchy: `save` writes every goal
//! and task, and `load` returns a fresh hierarchy that replaces the caller's
//! state. There is no incremental persistence and no locking.

use crate::goal::domain::GoalHierarchy;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for goal store operations.
pub type GoalStoreResult<T> = Result<T, GoalStoreError>;

/// Whole-hierarchy persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Writes every goal and task in the hierarchy, replacing what the store
    /// held before.
    ///
    /// # Errors
    ///
    /// Returns [`GoalStoreError::Persistence`] when the underlying storage
    /// cannot be written.
    async fn save(&self, goals: &GoalHierarchy) -> GoalStoreResult<()>;

    /// Reads the stored hierarchy.
    ///
    /// Malformed records are skipped and reported as [`LoadWarning`]s rather
    /// than failing the load.
    ///
    /// # Errors
    ///
    /// Returns [`GoalStoreError`] when the storage cannot be read or its
    /// layout is unusable as a whole.
    async fn load(&self) -> GoalStoreResult<LoadedGoals>;
}

/// Tabular sheet of the persisted layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    /// One row per goal.
    Goals,
    /// One row per task.
    Tasks,
}

impl Sheet {
    /// Returns the sheet name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goals => "Goals",
            Self::Tasks => "Tasks",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted record that was skipped or only partially applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Sheet holding the record.
    pub sheet: Sheet,
    /// One-based data row number, not counting the header.
    pub row: usize,
    /// Human-readable reason.
    pub reason: String,
}

impl LoadWarning {
    /// Creates a warning for a sheet row.
    #[must_use]
    pub fn new(sheet: Sheet, row: usize, reason: impl Into<String>) -> Self {
        Self {
            sheet,
            row,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row {}: {}", self.sheet, self.row, self.reason)
    }
}

/// Outcome of a best-effort load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedGoals {
    /// Rebuilt hierarchy.
    pub hierarchy: GoalHierarchy,
    /// Records that were skipped or adjusted.
    pub warnings: Vec<LoadWarning>,
}

impl LoadedGoals {
    /// Wraps a hierarchy that loaded without warnings.
    #[must_use]
    pub const fn clean(hierarchy: GoalHierarchy) -> Self {
        Self {
            hierarchy,
            warnings: Vec::new(),
        }
    }
}

/// Errors returned by goal store implementations.
#[derive(Debug, Clone, Error)]
pub enum GoalStoreError {
    /// A sheet lacks a column the loader cannot do without.
    #[error("sheet {sheet} is missing required column '{column}'")]
    MissingColumn {
        /// Sheet lacking the column.
        sheet: Sheet,
        /// Header name of the missing column.
        column: &'static str,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GoalStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
