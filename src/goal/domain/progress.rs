//! Progress aggregation over a goal hierarchy.
//!
//! Flat progress lives on [`Goal::progress`]. The functions here combine it
//! across sub-goals and return `None` for identifiers the hierarchy does not
//! hold.

use super::{Goal, GoalHierarchy, GoalId, Task};

/// Separator placed between titles in [`hierarchical_path`].
pub const PATH_SEPARATOR: &str = " > ";

/// Equal-weight average of a goal's own progress and each child's
/// hierarchical progress.
///
/// Own progress contributes only when the goal has tasks; every direct child
/// contributes one item regardless of how many tasks it holds. The result is
/// `0.0` when nothing contributes.
#[must_use]
pub fn hierarchical_progress(hierarchy: &GoalHierarchy, id: GoalId) -> Option<f64> {
    hierarchy
        .get(id)
        .map(|goal| goal_hierarchical_progress(hierarchy, goal))
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "percentages are reported as floating point"
)]
fn goal_hierarchical_progress(hierarchy: &GoalHierarchy, goal: &Goal) -> f64 {
    let own = (!goal.tasks().is_empty()).then(|| goal.progress());
    let items: Vec<f64> = own
        .into_iter()
        .chain(
            hierarchy
                .children(goal.id())
                .map(|child| goal_hierarchical_progress(hierarchy, child)),
        )
        .collect();
    if items.is_empty() {
        return 0.0;
    }
    items.iter().sum::<f64>() / items.len() as f64
}

/// A goal's own tasks followed by the tasks of its descendants in
/// pre-order.
#[must_use]
pub fn all_tasks(hierarchy: &GoalHierarchy, id: GoalId) -> Option<Vec<&Task>> {
    hierarchy.get(id)?;
    Some(
        hierarchy
            .subtree(id)
            .into_iter()
            .flat_map(|goal| goal.tasks().iter())
            .collect(),
    )
}

/// Titles from the root down to the goal, joined by [`PATH_SEPARATOR`].
#[must_use]
pub fn hierarchical_path(hierarchy: &GoalHierarchy, id: GoalId) -> Option<String> {
    let goal = hierarchy.get(id)?;
    let mut titles: Vec<&str> = hierarchy
        .ancestors(id)
        .into_iter()
        .map(Goal::title)
        .collect();
    titles.reverse();
    titles.push(goal.title());
    Some(titles.join(PATH_SEPARATOR))
}
