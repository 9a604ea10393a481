//! Given steps for goal hierarchy BDD scenarios.

use super::world::{GoalWorld, parse_goal_type};
use eyre::WrapErr;
use goalpost::goal::{domain::TaskStatus, services::NewTask};
use rstest_bdd_macros::given;

#[given("strict goal nesting is enabled")]
fn strict_nesting(world: &mut GoalWorld) {
    world.enable_strict_nesting();
}

#[given(r#"a root goal "{title}" of type {goal_type}"#)]
fn root_goal(world: &mut GoalWorld, title: String, goal_type: String) -> Result<(), eyre::Report> {
    let id = world
        .service
        .create_goal(title.clone(), parse_goal_type(&goal_type)?, None)
        .wrap_err("create root goal")?;
    world.goals.insert(title, id);
    Ok(())
}

#[given(r#"a goal "{title}" of type {goal_type} under "{parent}""#)]
fn child_goal(
    world: &mut GoalWorld,
    title: String,
    goal_type: String,
    parent: String,
) -> Result<(), eyre::Report> {
    let parent_id = world.goal(&parent)?;
    let id = world
        .service
        .create_hierarchical_goal(
            title.clone(),
            parse_goal_type(&goal_type)?,
            None,
            Some(parent_id),
        )
        .wrap_err("create child goal")?;
    world.goals.insert(title, id);
    Ok(())
}

#[given(r#"a done task "{title}" on "{goal}""#)]
fn done_task(world: &mut GoalWorld, title: String, goal: String) -> Result<(), eyre::Report> {
    let goal_id = world.goal(&goal)?;
    let task = world.service.add_task(goal_id, NewTask::new(title))?;
    world.service.set_task_status(task, TaskStatus::Done)?;
    Ok(())
}

#[given(r#"an open task "{title}" on "{goal}""#)]
fn open_task(world: &mut GoalWorld, title: String, goal: String) -> Result<(), eyre::Report> {
    let goal_id = world.goal(&goal)?;
    world.service.add_task(goal_id, NewTask::new(title))?;
    Ok(())
}
