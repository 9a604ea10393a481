//! Goal store backed by a workbook directory.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::{Clock, DefaultClock};
use tracing::{debug, info, warn};

use super::sheets;
use crate::goal::{
    domain::GoalHierarchy,
    ports::{GoalStore, GoalStoreError, GoalStoreResult, LoadedGoals},
};

/// File name of the goals sheet inside the workbook directory.
pub const GOALS_SHEET_FILE: &str = "Goals.csv";

/// File name of the tasks sheet inside the workbook directory.
pub const TASKS_SHEET_FILE: &str = "Tasks.csv";

/// Goal store writing the whole hierarchy to two CSV sheets.
///
/// Saves overwrite both sheets; each sheet is written to a staging file and
/// renamed into place. File access runs on the blocking thread pool. The two renames are not atomic as a pair.
#[derive(Debug, Clone)]
pub struct WorkbookGoalStore<C = DefaultClock> {
    root: Utf8PathBuf,
    clock: Arc<C>,
}

impl WorkbookGoalStore<DefaultClock> {
    /// Creates a store rooted at `root` using the system clock.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(DefaultClock))
    }
}

impl<C> WorkbookGoalStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a store rooted at `root`.
    ///
    /// The clock stamps goals whose `last modified` cell is empty on load.
    #[must_use]
    pub fn with_clock(root: impl Into<Utf8PathBuf>, clock: Arc<C>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    /// Returns the workbook directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn write_sheet(dir: &Dir, name: &str, contents: &[u8]) -> io::Result<()> {
    let staging = format!("{name}.tmp");
    dir.write(&staging, contents)?;
    dir.rename(&staging, dir, name)
}

fn open_root(root: &Utf8Path) -> io::Result<Dir> {
    Dir::open_ambient_dir(root, ambient_authority())
}

fn read_sheet(dir: &Dir, name: &str) -> io::Result<Option<Vec<u8>>> {
    match dir.read(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Runs blocking workbook I/O on tokio's blocking thread pool.
async fn run_blocking<F, T>(f: F) -> GoalStoreResult<T>
where
    F: FnOnce() -> GoalStoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(GoalStoreError::persistence)?
}

fn write_workbook(root: &Utf8Path, goals_sheet: &[u8], tasks_sheet: &[u8]) -> io::Result<()> {
    Dir::create_ambient_dir_all(root, ambient_authority())?;
    let dir = open_root(root)?;
    write_sheet(&dir, GOALS_SHEET_FILE, goals_sheet)?;
    write_sheet(&dir, TASKS_SHEET_FILE, tasks_sheet)
}

fn read_workbook(root: &Utf8Path, fallback_modified: DateTime<Utc>) -> GoalStoreResult<LoadedGoals> {
    let dir = match open_root(root) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(%root, "no goal workbook yet; starting empty");
            return Ok(LoadedGoals::default());
        }
        Err(err) => return Err(GoalStoreError::persistence(err)),
    };
    let Some(goals_sheet) =
        read_sheet(&dir, GOALS_SHEET_FILE).map_err(GoalStoreError::persistence)?
    else {
        debug!(%root, "goal workbook has no goals sheet; starting empty");
        return Ok(LoadedGoals::default());
    };
    let tasks_sheet = read_sheet(&dir, TASKS_SHEET_FILE).map_err(GoalStoreError::persistence)?;
    sheets::decode(&goals_sheet, tasks_sheet.as_deref(), fallback_modified)
}

#[async_trait]
impl<C> GoalStore for WorkbookGoalStore<C>
where
    C: Clock + Send + Sync,
{
    async fn save(&self, goals: &GoalHierarchy) -> GoalStoreResult<()> {
        let goals_sheet = sheets::encode_goals(goals)?;
        let tasks_sheet = sheets::encode_tasks(goals)?;
        let root = self.root.clone();

        run_blocking(move || {
            write_workbook(&root, &goals_sheet, &tasks_sheet).map_err(GoalStoreError::persistence)
        })
        .await?;

        debug!(root = %self.root, goals = goals.len(), "saved goal workbook");
        Ok(())
    }

    async fn load(&self) -> GoalStoreResult<LoadedGoals> {
        let root = self.root.clone();
        let fallback_modified = self.clock.utc();

        let loaded = run_blocking(move || read_workbook(&root, fallback_modified)).await?;

        for warning in &loaded.warnings {
            warn!(
                sheet = %warning.sheet,
                row = warning.row,
                reason = %warning.reason,
                "skipped workbook record"
            );
        }
        info!(
            root = %self.root,
            goals = loaded.hierarchy.len(),
            warnings = loaded.warnings.len(),
            "loaded goal workbook"
        );
        Ok(loaded)
    }
}
