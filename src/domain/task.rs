//! Task domain model
//!
//! A task is a single to-do item. Field names in the serialized form
//! (`task`, `completed`, `priority`, `due_date`, `category`, `created`)
//! match the backing file schema.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "Personal";

/// Date format for due dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for the `created` field
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Older files store creation time without seconds
const CREATED_FORMAT_SHORT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task description cannot be empty")]
    EmptyDescription,

    #[error("Invalid priority '{0}': expected High, Medium or Low")]
    InvalidPriority(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Priority of a task
///
/// Variant order is the sort rank: `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities in rank order
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    /// Accepts a name (any case, or its first letter) or a menu number 1-3
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" | "1" => Ok(Priority::High),
            "medium" | "m" | "2" => Ok(Priority::Medium),
            "low" | "l" | "3" => Ok(Priority::Low),
            _ => Err(TaskError::InvalidPriority(s.trim().to_string())),
        }
    }
}

/// Parses a due date in `YYYY-MM-DD` form
pub fn parse_date(input: &str) -> Result<NaiveDate, TaskError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| TaskError::InvalidDate(input.to_string()))
}

/// Normalizes a category label: trimmed, first letter upper-cased, rest lower-cased
pub fn normalize_category(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    #[serde(rename = "task", deserialize_with = "deserialize_description")]
    pub description: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,

    /// Records written before creation times were tracked get the load time
    #[serde(rename = "created", with = "created_format", default = "now")]
    created_at: NaiveDateTime,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Task {
    /// Creates a pending task with default priority and category
    pub fn new(description: impl Into<String>) -> Result<Self, TaskError> {
        let description = validate_description(description.into())?;

        Ok(Self {
            description,
            completed: false,
            priority: Priority::default(),
            category: default_category(),
            due_date: None,
            created_at: now(),
        })
    }

    /// Sets the priority (builder style)
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the category (builder style); a blank label keeps the current one
    pub fn with_category(mut self, category: &str) -> Self {
        self.set_category(category);
        self
    }

    /// Sets the due date (builder style)
    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Overrides the creation timestamp (used when importing legacy data and in tests)
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at.trunc_subsecs(0);
        self
    }

    /// When the task was created. Never changes after creation.
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Flips the completion flag and returns the new value
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// Replaces the category; a blank label keeps the current one
    pub fn set_category(&mut self, category: &str) {
        let category = normalize_category(category);
        if !category.is_empty() {
            self.category = category;
        }
    }

    /// Returns true if the task is due on or before `date`
    pub fn is_due_by(&self, date: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due <= date)
    }

    /// Applies a partial update. Omitted fields keep their current value.
    ///
    /// The edit is validated first so a failed edit leaves the task unchanged.
    pub fn apply(&mut self, edit: &TaskEdit) -> Result<(), TaskError> {
        edit.validate()?;

        if let Some(description) = &edit.description {
            self.description = description.trim().to_string();
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
        if let Some(category) = &edit.category {
            self.set_category(category);
        }
        if let Some(due_date) = edit.due_date {
            self.due_date = due_date;
        }
        Ok(())
    }
}

/// A partial update to a task
///
/// `None` means "keep the current value". For `due_date`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskEdit {
    /// Returns true if the edit changes nothing
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
    }

    fn validate(&self) -> Result<(), TaskError> {
        match &self.description {
            Some(description) if description.trim().is_empty() => Err(TaskError::EmptyDescription),
            _ => Ok(()),
        }
    }
}

/// Parses user input for a due date where `none` (or blank) means no date
pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, TaskError> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_date(input).map(Some)
    }
}

fn validate_description(description: String) -> Result<String, TaskError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Loaded descriptions obey the same rule as new ones
fn deserialize_description<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let description = String::deserialize(deserializer)?;
    validate_description(description).map_err(serde::de::Error::custom)
}

fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Serde adapter for `due_date`: `"YYYY-MM-DD"` or `null`
///
/// `"None"` and `""` are read as no date for compatibility with older files.
mod due_date_format {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse_optional_date(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Serde adapter for `created`
mod created_format {
    use super::*;

    pub fn serialize<S>(created: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&created.format(CREATED_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, CREATED_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&s, CREATED_FORMAT_SHORT))
            .map_err(|_| serde::de::Error::custom(format!("invalid created timestamp: {}", s)))
    }
}
