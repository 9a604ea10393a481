//! In-memory adapters for goal tracking ports.

mod store;

pub use store::InMemoryGoalStore;
