//! Adapter implementations for goal tracking ports.

pub mod memory;
pub mod notifier;
pub mod workbook;
