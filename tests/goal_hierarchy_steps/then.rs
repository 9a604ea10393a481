//! Then steps for goal hierarchy BDD scenarios.

use super::world::GoalWorld;
use goalpost::goal::{domain::GoalDomainError, services::GoalTrackerError};
use rstest_bdd_macros::then;

fn close_to(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-9)
}

#[then(r#"the hierarchical progress of "{title}" is {percent:f64} percent"#)]
fn hierarchical_progress_is(
    world: &GoalWorld,
    title: String,
    percent: f64,
) -> Result<(), eyre::Report> {
    let actual = world.service.hierarchical_progress(world.goal(&title)?);
    if !close_to(actual, percent) {
        return Err(eyre::eyre!(
            "expected hierarchical progress {percent}, got {actual:?}"
        ));
    }
    Ok(())
}

#[then(r#"the flat progress of "{title}" is {percent:f64} percent"#)]
fn flat_progress_is(world: &GoalWorld, title: String, percent: f64) -> Result<(), eyre::Report> {
    let actual = world.service.progress(world.goal(&title)?);
    if !close_to(actual, percent) {
        return Err(eyre::eyre!("expected flat progress {percent}, got {actual:?}"));
    }
    Ok(())
}

#[then(r#""{title}" has no sub-goals"#)]
fn has_no_sub_goals(world: &GoalWorld, title: String) -> Result<(), eyre::Report> {
    let goal = world
        .service
        .find_goal_by_id(world.goal(&title)?)
        .ok_or_else(|| eyre::eyre!("goal '{title}' missing"))?;
    if !goal.children().is_empty() {
        return Err(eyre::eyre!(
            "expected no sub-goals, found {}",
            goal.children().len()
        ));
    }
    Ok(())
}

#[then(r#"the path of "{title}" is "{path}""#)]
fn path_is(world: &GoalWorld, title: String, path: String) -> Result<(), eyre::Report> {
    let actual = world.service.hierarchical_path(world.goal(&title)?);
    if actual.as_deref() != Some(path.as_str()) {
        return Err(eyre::eyre!("expected path '{path}', got {actual:?}"));
    }
    Ok(())
}

#[then("goal creation fails with an invalid nesting error")]
fn invalid_nesting_error(world: &GoalWorld) -> Result<(), eyre::Report> {
    if !matches!(
        world.last_error,
        Some(GoalTrackerError::Domain(GoalDomainError::InvalidNesting { .. }))
    ) {
        return Err(eyre::eyre!(
            "expected invalid nesting error, got {:?}",
            world.last_error
        ));
    }
    Ok(())
}

#[then("no goals remain")]
fn no_goals_remain(world: &GoalWorld) -> Result<(), eyre::Report> {
    if !world.service.hierarchy().is_empty() {
        return Err(eyre::eyre!(
            "expected an empty hierarchy, found {} goals",
            world.service.hierarchy().len()
        ));
    }
    Ok(())
}

#[then(r#""{title}" owns {count:usize} task"#)]
fn owns_tasks(world: &GoalWorld, title: String, count: usize) -> Result<(), eyre::Report> {
    let goal = world
        .service
        .find_goal_by_id(world.goal(&title)?)
        .ok_or_else(|| eyre::eyre!("goal '{title}' missing"))?;
    if goal.tasks().len() != count {
        return Err(eyre::eyre!(
            "expected {count} tasks, found {}",
            goal.tasks().len()
        ));
    }
    Ok(())
}
