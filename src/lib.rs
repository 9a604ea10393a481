//! Goalpost: hierarchical goal tracking.
//!
//! This crate models long-, medium- and short-horizon goals as a forest,
//! attaches tasks to them, aggregates completion up the tree and persists the
//! whole hierarchy through a pluggable store.
//!
//! # Architecture
//!
//! Goalpost follows hexagonal architecture principles:
//!
//! - **Domain**: goals, tasks and the arena that links them
//! - **Ports**: store and notifier traits
//! - **Adapters**: in-memory and CSV workbook stores, a tracing notifier
//!
//! # Modules
//!
//! - [`config`]: tracker settings
//! - [`goal`]: goal hierarchy, tracker service and reminders

pub mod config;
pub mod goal;
