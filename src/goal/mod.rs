//! Hierarchical goal and task tracking.
//!
//! Goals nest by planning horizon, own their tasks, and report completion
//! both flat and aggregated over their sub-goals. The module follows
//! hexagonal architecture:
//!
//! - Domain types and the goal arena in [`domain`]
//! - Store and notifier contracts in [`ports`]
//! - In-memory, workbook and tracing implementations in [`adapters`]
//! - The tracker service, statistics and reminder scheduling in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
