//! Daily reminder scheduling.
//!
//! The scheduler wakes once a day at the configured local time, asks a
//! read-only source for a [`ReminderDigest`] and hands non-empty digests to a
//! [`ReminderNotifier`]. It never mutates goals.

use crate::goal::{domain::ReminderDigest, ports::ReminderNotifier};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use mockable::Clock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// First occurrence of `at` strictly after `now`.
#[must_use]
pub fn next_fire_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let same_day = now.date().and_time(at);
    if same_day > now {
        return same_day;
    }
    same_day
        .checked_add_signed(TimeDelta::days(1))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Fires a reminder digest once a day.
pub struct DailyReminderScheduler<N, C>
where
    N: ReminderNotifier,
    C: Clock + Send + Sync,
{
    notifier: Arc<N>,
    clock: Arc<C>,
    at: NaiveTime,
}

impl<N, C> DailyReminderScheduler<N, C>
where
    N: ReminderNotifier + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a scheduler that fires at local time `at`.
    #[must_use]
    pub const fn new(notifier: Arc<N>, clock: Arc<C>, at: NaiveTime) -> Self {
        Self {
            notifier,
            clock,
            at,
        }
    }

    /// Builds a digest for `date` and delivers it if it is not empty.
    ///
    /// Returns whether a digest was delivered. Notifier failures are logged
    /// and reported as `false`.
    pub async fn fire<F>(&self, date: NaiveDate, source: &F) -> bool
    where
        F: Fn(NaiveDate) -> ReminderDigest,
    {
        let digest = source(date);
        if digest.is_empty() {
            debug!(%date, "no reminders due");
            return false;
        }
        match self.notifier.notify(&digest).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%date, error = %err, "reminder delivery failed");
                false
            }
        }
    }

    /// Runs the daily loop on the tokio runtime until the handle is aborted.
    ///
    /// Wall-clock time is read once at start; later fire times follow the
    /// runtime's monotonic clock from that point.
    #[must_use]
    pub fn spawn<F>(self, source: F) -> JoinHandle<()>
    where
        F: Fn(NaiveDate) -> ReminderDigest + Send + Sync + 'static,
    {
        tokio::spawn(async move {
            let started_wall = self.clock.local().naive_local();
            let started = Instant::now();
            let mut cursor = started_wall;
            loop {
                let next = next_fire_after(cursor, self.at);
                let offset = next
                    .signed_duration_since(started_wall)
                    .to_std()
                    .unwrap_or_default();
                debug!(fire_at = %next, "reminder scheduled");
                tokio::time::sleep_until(started + offset).await;
                let delivered = self.fire(next.date(), &source).await;
                debug!(date = %next.date(), delivered, "reminder fired");
                cursor = next;
            }
        })
    }
}
