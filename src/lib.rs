//! Todo CLI - A personal to-do list manager for the terminal
//!
//! Tasks carry a description, completion flag, priority, category, optional
//! due date and creation time. The list lives in a single JSON file (or the
//! legacy one-line-per-task text format) and is saved after every change.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Priority, SortKey, Task, TaskEdit};
pub use storage::{Config, TaskStore};
