//! In-memory integration tests for goal and task workflows.

use super::helpers::{TestService, build_chain, date, service};
use goalpost::goal::{
    domain::{GoalDomainError, GoalType, TaskPriority, TaskStatus},
    services::{GoalTrackerError, NewTask},
};
use rstest::rstest;

#[rstest]
fn chain_reports_paths_and_levels(mut service: TestService) -> eyre::Result<()> {
    let chain = build_chain(&mut service)?;

    eyre::ensure!(service.hierarchical_path(chain.month).as_deref() == Some("Vision > Plan > Sprint"));
    let levels: Vec<u8> = service
        .all_goals_flattened()
        .into_iter()
        .map(|goal| goal.hierarchy_level())
        .collect();
    eyre::ensure!(levels == [0, 1, 2], "unexpected levels {levels:?}");
    Ok(())
}

#[rstest]
fn progress_rolls_up_with_equal_weights(mut service: TestService) -> eyre::Result<()> {
    let chain = build_chain(&mut service)?;
    let done = service.add_task(chain.year, NewTask::new("Quarterly review"))?;
    service.add_task(chain.month, NewTask::new("Ship feature"))?;
    service.add_task(chain.month, NewTask::new("Write docs"))?;
    service.set_task_status(done, TaskStatus::Done)?;

    // Plan: own 100, Sprint 0 => 50. Vision: only Plan contributes => 50.
    eyre::ensure!(service.progress(chain.year) == Some(100.0));
    eyre::ensure!(service.hierarchical_progress(chain.year) == Some(50.0));
    eyre::ensure!(service.hierarchical_progress(chain.long_term) == Some(50.0));
    eyre::ensure!(service.progress(chain.long_term) == Some(0.0));
    eyre::ensure!(service.all_tasks(chain.long_term).map(|tasks| tasks.len()) == Some(3));
    Ok(())
}

#[rstest]
fn tasks_move_between_goals_without_duplication(mut service: TestService) -> eyre::Result<()> {
    let chain = build_chain(&mut service)?;
    let task = service.add_task(
        chain.month,
        NewTask::new("Hire designer").with_priority(TaskPriority::Urgent),
    )?;

    service.move_task(task, chain.year)?;

    let everywhere = service
        .all_tasks(chain.long_term)
        .ok_or_else(|| eyre::eyre!("missing root"))?;
    eyre::ensure!(everywhere.len() == 1);
    eyre::ensure!(service.hierarchy().task_owner(task) == Some(chain.year));
    Ok(())
}

#[rstest]
fn deleting_a_branch_keeps_siblings(mut service: TestService) -> eyre::Result<()> {
    let chain = build_chain(&mut service)?;
    let sibling =
        service.create_hierarchical_goal("Side quest", GoalType::Yearly, None, Some(chain.long_term))?;

    let removed = service.delete_goal_hierarchically(chain.year)?;

    eyre::ensure!(removed.len() == 2);
    let remaining: Vec<&str> = service
        .all_goals_flattened()
        .into_iter()
        .map(|goal| goal.title())
        .collect();
    eyre::ensure!(remaining == ["Vision", "Side quest"]);
    eyre::ensure!(service.find_goal_by_id(sibling).is_some());
    Ok(())
}

#[rstest]
fn deleting_an_unknown_goal_fails(mut service: TestService) -> eyre::Result<()> {
    let chain = build_chain(&mut service)?;
    service.delete_goal_hierarchically(chain.month)?;

    let result = service.delete_goal_hierarchically(chain.month);

    eyre::ensure!(matches!(
        result,
        Err(GoalTrackerError::Domain(GoalDomainError::GoalNotFound(id))) if id == chain.month
    ));
    Ok(())
}

#[rstest]
fn statistics_and_due_queries_see_every_goal(mut service: TestService) -> eyre::Result<()> {
    let chain = build_chain(&mut service)?;
    service.add_task(
        chain.month,
        NewTask::new("Old chore").with_due_date(date(2000, 1, 1)),
    )?;
    let finished = service.add_task(
        chain.long_term,
        NewTask::new("Kickoff").with_due_date(date(2000, 1, 2)),
    )?;
    service.set_task_status(finished, TaskStatus::Done)?;

    let stats = service.statistics();

    eyre::ensure!(stats.total_goals == 3);
    eyre::ensure!(stats.total_tasks == 2);
    eyre::ensure!(stats.overdue_tasks == 1);
    eyre::ensure!(service.tasks_due_between(date(2000, 1, 1), date(2000, 1, 31)).len() == 2);

    let digest = service.reminder_digest();
    let paths: Vec<&str> = digest
        .entries()
        .iter()
        .map(|entry| entry.goal_path.as_str())
        .collect();
    eyre::ensure!(paths == ["Vision > Plan > Sprint"]);
    Ok(())
}
