//! Tests for daily reminder scheduling.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::goal::{
    adapters::notifier::TracingNotifier,
    domain::{Goal, GoalHierarchy, GoalType, ReminderDigest, Task},
    ports::{NotifierError, ReminderNotifier},
    services::{DailyReminderScheduler, next_fire_after},
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[derive(Default)]
struct RecordingNotifier {
    delivered: Mutex<Vec<NaiveDate>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            delivered: Mutex::default(),
            fail: true,
        }
    }

    fn dates(&self) -> Vec<NaiveDate> {
        self.delivered.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl ReminderNotifier for RecordingNotifier {
    async fn notify(&self, digest: &ReminderDigest) -> Result<(), NotifierError> {
        if self.fail {
            return Err(NotifierError::delivery(std::io::Error::other("smtp down")));
        }
        self.delivered
            .lock()
            .expect("notifier lock")
            .push(digest.date());
        Ok(())
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(time(hour, minute))
}

/// One goal with a single open task that is always overdue.
#[fixture]
fn overdue_hierarchy() -> GoalHierarchy {
    let mut hierarchy = GoalHierarchy::new();
    let mut goal =
        Goal::new("Paperwork", GoalType::Monthly, None, &DefaultClock).expect("valid goal");
    let task = Task::new("Renew passport", None, Some(date(2000, 1, 1))).expect("valid task");
    goal.add_task(task, &DefaultClock);
    hierarchy.insert_root(goal).expect("root inserted");
    hierarchy
}

fn scheduler(
    notifier: &Arc<RecordingNotifier>,
) -> DailyReminderScheduler<RecordingNotifier, DefaultClock> {
    DailyReminderScheduler::new(Arc::clone(notifier), Arc::new(DefaultClock), time(8, 0))
}

#[rstest]
#[case(at(date(2024, 3, 10), 7, 59), at(date(2024, 3, 10), 8, 0))]
#[case(at(date(2024, 3, 10), 8, 0), at(date(2024, 3, 11), 8, 0))]
#[case(at(date(2024, 3, 10), 21, 30), at(date(2024, 3, 11), 8, 0))]
#[case(at(date(2024, 12, 31), 9, 0), at(date(2025, 1, 1), 8, 0))]
fn next_fire_is_strictly_after_now(#[case] now: NaiveDateTime, #[case] expected: NaiveDateTime) {
    assert_eq!(next_fire_after(now, time(8, 0)), expected);
}

#[rstest]
#[tokio::test]
async fn fire_delivers_non_empty_digests(overdue_hierarchy: GoalHierarchy) -> eyre::Result<()> {
    let notifier = Arc::new(RecordingNotifier::default());
    let scheduler = scheduler(&notifier);
    let source = move |day| ReminderDigest::collect(&overdue_hierarchy, day);

    let delivered = scheduler.fire(date(2024, 3, 10), &source).await;

    ensure!(delivered);
    ensure!(notifier.dates() == vec![date(2024, 3, 10)]);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn fire_skips_empty_digests() -> eyre::Result<()> {
    let notifier = Arc::new(RecordingNotifier::default());
    let scheduler = scheduler(&notifier);
    let empty = GoalHierarchy::new();
    let source = move |day| ReminderDigest::collect(&empty, day);

    let delivered = scheduler.fire(date(2024, 3, 10), &source).await;

    ensure!(!delivered);
    ensure!(notifier.dates().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn delivery_failures_are_not_fatal(overdue_hierarchy: GoalHierarchy) -> eyre::Result<()> {
    let notifier = Arc::new(RecordingNotifier::failing());
    let scheduler = scheduler(&notifier);
    let source = move |day| ReminderDigest::collect(&overdue_hierarchy, day);

    let delivered = scheduler.fire(date(2024, 3, 10), &source).await;

    ensure!(!delivered);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn tracing_notifier_accepts_digests(overdue_hierarchy: GoalHierarchy) -> eyre::Result<()> {
    let digest = ReminderDigest::collect(&overdue_hierarchy, date(2024, 3, 10));

    TracingNotifier.notify(&digest).await?;

    ensure!(digest.entries().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn spawned_scheduler_fires_once_per_day(
    overdue_hierarchy: GoalHierarchy,
) -> eyre::Result<()> {
    let notifier = Arc::new(RecordingNotifier::default());
    let handle = scheduler(&notifier)
        .spawn(move |day| ReminderDigest::collect(&overdue_hierarchy, day));

    tokio::time::sleep(Duration::from_secs(3 * 86_400 + 1)).await;
    handle.abort();

    let dates = notifier.dates();
    ensure!((3..=4).contains(&dates.len()), "fired {} times", dates.len());
    let first = *dates.first().ok_or_eyre("no reminder fired")?;
    for (offset, day) in dates.iter().enumerate() {
        let expected = first
            .checked_add_days(chrono::Days::new(u64::try_from(offset)?))
            .ok_or_eyre("date overflow")?;
        ensure!(*day == expected);
    }
    Ok(())
}
