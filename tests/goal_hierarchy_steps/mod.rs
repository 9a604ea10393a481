//! Step definitions for goal hierarchy scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
