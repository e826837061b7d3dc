pub mod calendar;
pub mod config;
pub mod error;
pub mod import;
pub mod planner;
pub mod recurrence;
pub mod reminder;
pub mod store;
pub mod task;
pub mod ticker;
pub mod ui;
