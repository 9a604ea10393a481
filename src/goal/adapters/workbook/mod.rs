//! Workbook adapter: a directory holding a `Goals` and a `Tasks` sheet.
//!
//! Each sheet is a CSV file. The directory is opened through `cap-std`, so
//! the store never touches paths outside it.

mod sheets;
mod store;

pub use store::{GOALS_SHEET_FILE, TASKS_SHEET_FILE, WorkbookGoalStore};
