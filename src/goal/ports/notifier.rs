//! Notifier port for the daily reminder.

use crate::goal::domain::ReminderDigest;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Delivers reminder digests to the user.
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    /// Delivers a non-empty digest.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when the digest could not be
    /// delivered.
    async fn notify(&self, digest: &ReminderDigest) -> Result<(), NotifierError>;
}

/// Errors returned by reminder notifiers.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The channel rejected or lost the digest.
    #[error("reminder delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
