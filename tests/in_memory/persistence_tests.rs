//! In-memory integration tests for whole-hierarchy persistence.

use std::sync::Arc;

use super::helpers::{TestService, build_chain, service, store};
use goalpost::goal::{
    adapters::memory::InMemoryGoalStore,
    domain::GoalType,
    ports::GoalStore,
    services::{GoalTrackerService, NewTask},
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn loading_before_any_save_yields_an_empty_hierarchy(
    mut service: TestService,
) -> eyre::Result<()> {
    service.create_goal("Transient", GoalType::Daily, None)?;

    let warnings = service.load_goals_from_file().await?;

    eyre::ensure!(warnings.is_empty());
    eyre::ensure!(service.hierarchy().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_second_service_sees_the_saved_hierarchy(
    store: Arc<InMemoryGoalStore>,
) -> eyre::Result<()> {
    let mut writer = GoalTrackerService::new(Arc::clone(&store), Arc::new(DefaultClock));
    let chain = build_chain(&mut writer)?;
    writer.add_task(chain.month, NewTask::new("Demo"))?;
    writer.save_goals_to_file().await?;
    eyre::ensure!(store.has_snapshot()?);

    let mut reader = GoalTrackerService::new(Arc::clone(&store), Arc::new(DefaultClock));
    reader.load_goals_from_file().await?;

    eyre::ensure!(reader.hierarchy() == writer.hierarchy());
    eyre::ensure!(
        reader.hierarchical_path(chain.month).as_deref() == Some("Vision > Plan > Sprint")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saving_replaces_the_previous_snapshot(store: Arc<InMemoryGoalStore>) -> eyre::Result<()> {
    let mut service = GoalTrackerService::new(Arc::clone(&store), Arc::new(DefaultClock));
    let first = service.create_goal("First", GoalType::Weekly, None)?;
    service.save_goals_to_file().await?;
    service.delete_goal_hierarchically(first)?;
    service.create_goal("Second", GoalType::Weekly, None)?;
    service.save_goals_to_file().await?;

    let loaded = store.load().await?;

    let titles: Vec<&str> = loaded.hierarchy.roots().map(|goal| goal.title()).collect();
    eyre::ensure!(titles == ["Second"]);
    Ok(())
}
