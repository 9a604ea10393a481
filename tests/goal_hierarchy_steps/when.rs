//! When steps for goal hierarchy BDD scenarios.

use super::world::{GoalWorld, parse_goal_type, run_async};
use rstest_bdd_macros::when;

#[when(r#""{title}" is moved under "{parent}""#)]
fn move_goal(world: &mut GoalWorld, title: String, parent: String) -> Result<(), eyre::Report> {
    let id = world.goal(&title)?;
    let parent_id = world.goal(&parent)?;
    world.service.move_goal(id, Some(parent_id))?;
    Ok(())
}

#[when(r#"a goal "{title}" of type {goal_type} is created under "{parent}""#)]
fn attempt_child_goal(
    world: &mut GoalWorld,
    title: String,
    goal_type: String,
    parent: String,
) -> Result<(), eyre::Report> {
    let parent_id = world.goal(&parent)?;
    match world.service.create_hierarchical_goal(
        title.clone(),
        parse_goal_type(&goal_type)?,
        None,
        Some(parent_id),
    ) {
        Ok(id) => {
            world.goals.insert(title, id);
        }
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#""{title}" is deleted"#)]
fn delete_goal(world: &mut GoalWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.goal(&title)?;
    world.service.delete_goal_hierarchically(id)?;
    Ok(())
}

#[when("the goals are saved and reloaded")]
fn save_and_reload(world: &mut GoalWorld) -> Result<(), eyre::Report> {
    run_async(world.service.save_goals_to_file())?;
    let warnings = run_async(world.service.load_goals_from_file())?;
    eyre::ensure!(warnings.is_empty(), "unexpected load warnings {warnings:?}");
    Ok(())
}
