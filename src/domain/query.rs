//! Filtering, searching and sorting over a list of tasks
//!
//! Filters and searches are read-only views: they return the matching tasks
//! together with their 1-based position in the list. Sorting reorders the
//! list in place and is stable, so ties keep their relative order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use super::task::{normalize_category, parse_date, Priority, Task, TaskError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown filter '{0}': expected completed, pending, priority, category, due or keyword")]
    UnknownFilter(String),

    #[error("Unknown sort option '{0}': expected priority, due, completion, alpha or created")]
    UnknownSort(String),

    #[error("Filter '{0}' needs a value")]
    MissingValue(&'static str),

    #[error(transparent)]
    Invalid(#[from] TaskError),
}

/// The kind of filter, before its argument is known
///
/// Interactive callers pick a kind first and then prompt for the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Completed,
    Pending,
    Priority,
    Category,
    DueBy,
    Keyword,
}

impl FilterKind {
    /// All kinds in menu order
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Completed,
        FilterKind::Pending,
        FilterKind::Priority,
        FilterKind::Category,
        FilterKind::DueBy,
        FilterKind::Keyword,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::Completed => "Completed only",
            FilterKind::Pending => "Pending only",
            FilterKind::Priority => "By priority",
            FilterKind::Category => "By category",
            FilterKind::DueBy => "Due on or before a date",
            FilterKind::Keyword => "By keyword",
        }
    }

    /// Returns true if this kind needs a value to become a [`Filter`]
    pub fn needs_value(&self) -> bool {
        !matches!(self, FilterKind::Completed | FilterKind::Pending)
    }

    fn name(&self) -> &'static str {
        match self {
            FilterKind::Completed => "completed",
            FilterKind::Pending => "pending",
            FilterKind::Priority => "priority",
            FilterKind::Category => "category",
            FilterKind::DueBy => "due",
            FilterKind::Keyword => "keyword",
        }
    }

    /// Builds the filter from its value. The value is ignored for kinds that take none.
    pub fn with_value(self, value: Option<&str>) -> Result<Filter, QueryError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());

        let required = || value.ok_or(QueryError::MissingValue(self.name()));

        Ok(match self {
            FilterKind::Completed => Filter::Completed,
            FilterKind::Pending => Filter::Pending,
            FilterKind::Priority => Filter::Priority(required()?.parse()?),
            FilterKind::Category => Filter::Category(normalize_category(required()?)),
            FilterKind::DueBy => Filter::DueBy(parse_date(required()?)?),
            FilterKind::Keyword => Filter::Keyword(required()?.to_string()),
        })
    }
}

impl FromStr for FilterKind {
    type Err = QueryError;

    /// Accepts a name or a menu number 1-6
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" | "done" | "1" => Ok(FilterKind::Completed),
            "pending" | "todo" | "2" => Ok(FilterKind::Pending),
            "priority" | "3" => Ok(FilterKind::Priority),
            "category" | "4" => Ok(FilterKind::Category),
            "due" | "due-by" | "5" => Ok(FilterKind::DueBy),
            "keyword" | "search" | "6" => Ok(FilterKind::Keyword),
            _ => Err(QueryError::UnknownFilter(s.trim().to_string())),
        }
    }
}

/// A single filter criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Completed,
    Pending,
    Priority(Priority),
    /// Category label, compared case-insensitively
    Category(String),
    /// Due on or before the date; undated tasks never match
    DueBy(NaiveDate),
    /// Case-insensitive substring of the description
    Keyword(String),
}

impl Filter {
    /// Returns true if the task passes this filter
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::Completed => task.completed,
            Filter::Pending => !task.completed,
            Filter::Priority(priority) => task.priority == *priority,
            Filter::Category(category) => task.category.to_lowercase() == category.to_lowercase(),
            Filter::DueBy(date) => task.is_due_by(*date),
            Filter::Keyword(keyword) => task
                .description
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Completed => write!(f, "completed"),
            Filter::Pending => write!(f, "pending"),
            Filter::Priority(priority) => write!(f, "priority = {}", priority),
            Filter::Category(category) => write!(f, "category = {}", category),
            Filter::DueBy(date) => write!(f, "due by {}", date),
            Filter::Keyword(keyword) => write!(f, "keyword '{}'", keyword),
        }
    }
}

/// A task in a view, with its 1-based position in the full list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    pub number: usize,
    pub task: &'a Task,
}

/// Returns the tasks that pass `filter`, in list order
pub fn filter<'a>(tasks: &'a [Task], filter: &Filter) -> Vec<Hit<'a>> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(i, task)| Hit { number: i + 1, task })
        .collect()
}

/// Case-insensitive keyword search over descriptions
pub fn search<'a>(tasks: &'a [Task], keyword: &str) -> Vec<Hit<'a>> {
    filter(tasks, &Filter::Keyword(keyword.trim().to_string()))
}

/// Sort order for the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// High, then Medium, then Low
    Priority,
    /// Earliest due date first, undated tasks last
    DueDate,
    /// Pending tasks before completed ones
    Completion,
    /// Description A-Z, ignoring case
    Alphabetical,
    /// Oldest first
    Created,
}

impl SortKey {
    /// All keys in menu order
    pub const ALL: [SortKey; 5] = [
        SortKey::Priority,
        SortKey::DueDate,
        SortKey::Completion,
        SortKey::Alphabetical,
        SortKey::Created,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Priority => "Priority",
            SortKey::DueDate => "Due date",
            SortKey::Completion => "Pending first",
            SortKey::Alphabetical => "Alphabetical (A-Z)",
            SortKey::Created => "Creation time",
        }
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::Priority => a.priority.cmp(&b.priority),
            SortKey::DueDate => due_rank(a).cmp(&due_rank(b)),
            SortKey::Completion => a.completed.cmp(&b.completed),
            SortKey::Alphabetical => a
                .description
                .to_lowercase()
                .cmp(&b.description.to_lowercase()),
            SortKey::Created => a.created_at().cmp(&b.created_at()),
        }
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    /// Accepts a name or a menu number 1-5
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "priority" | "1" => Ok(SortKey::Priority),
            "due" | "due-date" | "2" => Ok(SortKey::DueDate),
            "completion" | "status" | "3" => Ok(SortKey::Completion),
            "alpha" | "alphabetical" | "name" | "4" => Ok(SortKey::Alphabetical),
            "created" | "creation" | "5" => Ok(SortKey::Created),
            _ => Err(QueryError::UnknownSort(s.trim().to_string())),
        }
    }
}

/// Undated tasks rank after every real date
fn due_rank(task: &Task) -> NaiveDate {
    task.due_date.unwrap_or(NaiveDate::MAX)
}

/// Reorders `tasks` in place by `key`
pub fn sort(tasks: &mut [Task], key: SortKey) {
    tasks.sort_by(|a, b| key.compare(a, b));
}
