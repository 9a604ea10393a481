//! Tests for hierarchy-wide statistics.

use crate::goal::{
    domain::{Goal, GoalHierarchy, GoalType, Task, TaskPriority, TaskStatus},
    services::GoalStatistics,
};
use chrono::NaiveDate;
use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use rstest::rstest;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn task(
    title: &str,
    status: TaskStatus,
    priority: TaskPriority,
    due: Option<NaiveDate>,
) -> eyre::Result<Task> {
    let mut task = Task::new(title, None, due)?;
    task.set_status(status, &DefaultClock);
    task.set_priority(priority);
    Ok(task)
}

#[rstest]
fn empty_hierarchy_has_zero_counts() {
    let stats = GoalStatistics::collect(&GoalHierarchy::new(), date(2024, 1, 1));

    assert_eq!(stats.total_goals, 0);
    assert_eq!(stats.total_tasks, 0);
    assert!(stats.completion_rate().abs() < f64::EPSILON);
    assert_eq!(stats.tasks_by_priority.len(), TaskPriority::ALL.len());
    assert!(stats.goals_by_type.is_empty());
}

#[rstest]
fn counts_cover_every_depth() -> eyre::Result<()> {
    let today = date(2024, 6, 15);
    let mut hierarchy = GoalHierarchy::new();
    let root = hierarchy.insert_root(Goal::new("Root", GoalType::LongTerm, None, &DefaultClock)?)?;
    let child = hierarchy.insert_child(
        root,
        Goal::new("Child", GoalType::Yearly, None, &DefaultClock)?,
    )?;
    let tasks = [
        (root, task("a", TaskStatus::Done, TaskPriority::High, None)?),
        (root, task("b", TaskStatus::ToDo, TaskPriority::Low, Some(date(2024, 6, 1)))?),
        (child, task("c", TaskStatus::InProgress, TaskPriority::High, Some(today))?),
        (child, task("d", TaskStatus::Done, TaskPriority::Urgent, Some(date(2024, 6, 1)))?),
    ];
    for (owner, item) in tasks {
        hierarchy
            .get_mut(owner)
            .ok_or_eyre("goal missing")?
            .add_task(item, &DefaultClock);
    }
    hierarchy
        .get_mut(child)
        .ok_or_eyre("goal missing")?
        .set_completed(true, &DefaultClock);

    let stats = GoalStatistics::collect(&hierarchy, today);

    ensure!(stats.total_goals == 2);
    ensure!(stats.completed_goals == 1);
    ensure!(stats.total_tasks == 4);
    ensure!(stats.todo_tasks == 1);
    ensure!(stats.in_progress_tasks == 1);
    ensure!(stats.done_tasks == 2);
    ensure!(stats.overdue_tasks == 1);
    ensure!(stats.tasks_by_priority.get(&TaskPriority::High) == Some(&2));
    ensure!(stats.tasks_by_priority.get(&TaskPriority::Medium) == Some(&0));
    ensure!(stats.goals_by_type.get(&GoalType::Yearly) == Some(&1));
    ensure!((stats.completion_rate() - 50.0).abs() < f64::EPSILON);
    Ok(())
}
