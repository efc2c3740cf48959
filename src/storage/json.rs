//! JSON storage for tasks
//!
//! Tasks are stored as a pretty-printed JSON array of records, in list order.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::file::{read_optional, write_atomic, StorageError, TaskFile};
use crate::domain::Task;

/// Task file in the structured JSON format
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Creates a JSON task file at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Serializes tasks the way they are written to disk
pub fn to_json(tasks: &[Task]) -> Result<String, StorageError> {
    let mut json = serde_json::to_string_pretty(tasks)?;
    json.push('\n');
    Ok(json)
}

impl TaskFile for JsonFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Task>, StorageError> {
        let content = match read_optional(&self.path)? {
            Some(content) => content,
            None => {
                debug!(path = %self.path.display(), "task file not found, starting empty");
                return Ok(Vec::new());
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> =
            serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let json = to_json(tasks)?;
        write_atomic(&self.path, json.as_bytes())?;

        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::Priority;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn priority() -> impl Strategy<Value = Priority> {
        prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
    }

    fn task() -> impl Strategy<Value = Task> {
        (
            "[A-Za-z0-9][A-Za-z0-9 ,\"|:-]{0,30}",
            any::<bool>(),
            priority(),
            "[a-z]{1,12}",
            proptest::option::of(0i64..20_000),
            0i64..600_000_000,
        )
            .prop_map(|(description, completed, priority, category, due, created)| {
                let epoch = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
                let mut task = Task::new(description)
                    .unwrap()
                    .with_priority(priority)
                    .with_category(&category)
                    .with_due_date(due.map(|days| epoch + Duration::days(days)))
                    .with_created_at(epoch.and_hms_opt(0, 0, 0).unwrap() + Duration::seconds(created));
                if completed {
                    task.toggle();
                }
                task
            })
    }

    proptest! {
        #[test]
        fn save_then_load_round_trips(tasks in proptest::collection::vec(task(), 0..12)) {
            let dir = TempDir::new().unwrap();
            let file = JsonFile::new(dir.path().join("tasks.json"));

            file.save(&tasks).unwrap();
            prop_assert_eq!(file.load().unwrap(), tasks);
        }

        #[test]
        fn toggle_twice_restores_task(mut task in task()) {
            let before = task.clone();
            let first = task.toggle();
            prop_assert_ne!(first, before.completed);
            task.toggle();
            prop_assert_eq!(task, before);
        }
    }
}
