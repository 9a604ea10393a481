//! Unit tests for the goal bounded context.

mod reminder_tests;
mod statistics_tests;
