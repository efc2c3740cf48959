//! Domain models for the task list
//!
//! Contains the core business logic without any I/O concerns.

mod index;
mod query;
mod task;

pub use index::{check_index, parse_number, IndexError};
pub use query::{filter, search, sort, Filter, FilterKind, Hit, QueryError, SortKey};
pub use task::{
    normalize_category, parse_date, parse_optional_date, Priority, Task, TaskEdit, TaskError,
    CREATED_FORMAT, DATE_FORMAT, DEFAULT_CATEGORY,
};
