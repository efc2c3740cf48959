//! Legacy line storage
//!
//! One task per line as `description|1` (done) or `description|0` (pending).
//! Only the description and completion flag survive a save; everything else
//! takes its default value on load.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::file::{read_optional, write_atomic, StorageError, TaskFile};
use crate::domain::Task;

const DELIMITER: char = '|';

/// Task file in the legacy line format
pub struct LineFile {
    path: PathBuf,
}

impl LineFile {
    /// Creates a line task file at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parses one line. Blank lines yield `None`.
///
/// Text after the last `|` is the flag: `1` means done, anything else
/// (including a missing or malformed flag) means pending. A line without a
/// `|` is a pending task whose description is the whole line.
fn parse_line(line: &str) -> Option<Task> {
    let line = line.trim_end_matches(['\r', '\n']);

    let (description, completed) = match line.rsplit_once(DELIMITER) {
        Some((description, flag)) => (description, flag.trim() == "1"),
        None => (line, false),
    };

    let mut task = Task::new(description).ok()?;
    task.completed = completed;
    Some(task)
}

fn format_line(task: &Task) -> String {
    let description = task.description.replace(['\r', '\n'], " ");
    format!(
        "{}{}{}",
        description,
        DELIMITER,
        if task.completed { "1" } else { "0" }
    )
}

impl TaskFile for LineFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Task>, StorageError> {
        let Some(content) = read_optional(&self.path)? else {
            debug!(path = %self.path.display(), "task file not found, starting empty");
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> = content.lines().filter_map(parse_line).collect();

        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let mut content = String::new();
        for task in tasks {
            content.push_str(&format_line(task));
            content.push('\n');
        }

        write_atomic(&self.path, content.as_bytes())?;

        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}
