//! Notifier that writes reminder digests to the tracing log.

use async_trait::async_trait;
use tracing::info;

use crate::goal::{
    domain::{ReminderDigest, ReminderKind},
    ports::{NotifierError, ReminderNotifier},
};

/// Logs each reminder entry at `INFO` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl ReminderNotifier for TracingNotifier {
    async fn notify(&self, digest: &ReminderDigest) -> Result<(), NotifierError> {
        info!(
            date = %digest.date(),
            overdue = digest.of_kind(ReminderKind::Overdue).count(),
            due_today = digest.of_kind(ReminderKind::DueToday).count(),
            "daily reminder"
        );
        for entry in digest.entries() {
            info!(
                goal = %entry.goal_path,
                task = %entry.task_title,
                priority = %entry.priority,
                due = %entry.due_date,
                kind = ?entry.kind,
                "reminder entry"
            );
        }
        Ok(())
    }
}
