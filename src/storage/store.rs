//! The task store
//!
//! Owns the ordered task list and its backing file. Every mutation writes
//! the whole list back before returning.

use thiserror::Error;
use tracing::{info, warn};

use super::file::{StorageError, TaskFile};
use crate::domain::{check_index, sort, IndexError, SortKey, Task, TaskEdit, TaskError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Invalid(#[from] TaskError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Ordered, persisted task list
pub struct TaskStore {
    file: Box<dyn TaskFile>,
    tasks: Vec<Task>,
    load_warning: Option<String>,
}

impl TaskStore {
    /// Opens the store, loading whatever the backing file holds
    ///
    /// Loading never fails: an unreadable or corrupt file leaves the store
    /// empty and keeps a warning for the caller to show.
    pub fn open(file: Box<dyn TaskFile>) -> Self {
        let (tasks, load_warning) = match file.load() {
            Ok(tasks) => (tasks, None),
            Err(err) => {
                warn!(path = %file.path().display(), error = %err, "could not load task file, starting with an empty list");
                let message = format!("{}. Starting with an empty list.", err);
                (Vec::new(), Some(message))
            }
        };

        Self {
            file,
            tasks,
            load_warning,
        }
    }

    /// Warning produced while loading, if the backing file was unreadable
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Returns the backing file
    pub fn file(&self) -> &dyn TaskFile {
        self.file.as_ref()
    }

    /// All tasks in list order
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the task at a 1-based position
    pub fn get(&self, number: i64) -> Result<&Task, IndexError> {
        let idx = check_index(number, self.tasks.len())?;
        Ok(&self.tasks[idx])
    }

    /// Appends a task and persists
    pub fn add(&mut self, task: Task) -> Result<&Task, StoreError> {
        self.tasks.push(task);
        if let Err(err) = self.persist() {
            self.tasks.pop();
            return Err(err.into());
        }

        let last = self.tasks.len() - 1;
        info!(description = %self.tasks[last].description, "added task");
        Ok(&self.tasks[last])
    }

    /// Removes the task at a 1-based position and persists
    pub fn remove(&mut self, number: i64) -> Result<Task, StoreError> {
        let idx = check_index(number, self.tasks.len())?;
        let removed = self.tasks.remove(idx);
        if let Err(err) = self.persist() {
            self.tasks.insert(idx, removed);
            return Err(err.into());
        }

        info!(number, description = %removed.description, "removed task");
        Ok(removed)
    }

    /// Applies a partial edit to the task at a 1-based position and persists
    ///
    /// A rejected edit leaves the task unchanged and writes nothing.
    pub fn edit(&mut self, number: i64, edit: &TaskEdit) -> Result<&Task, StoreError> {
        let idx = check_index(number, self.tasks.len())?;
        let previous = self.tasks[idx].clone();
        self.tasks[idx].apply(edit)?;
        if let Err(err) = self.persist() {
            self.tasks[idx] = previous;
            return Err(err.into());
        }

        info!(number, "edited task");
        Ok(&self.tasks[idx])
    }

    /// Flips completion of the task at a 1-based position and persists
    pub fn toggle(&mut self, number: i64) -> Result<&Task, StoreError> {
        let idx = check_index(number, self.tasks.len())?;
        let completed = self.tasks[idx].toggle();
        if let Err(err) = self.persist() {
            self.tasks[idx].toggle();
            return Err(err.into());
        }

        info!(number, completed, "toggled task");
        Ok(&self.tasks[idx])
    }

    /// Reorders the list by `key` and persists
    pub fn sort(&mut self, key: SortKey) -> Result<(), StoreError> {
        let previous = self.tasks.clone();
        sort(&mut self.tasks, key);
        if let Err(err) = self.persist() {
            self.tasks = previous;
            return Err(err.into());
        }

        info!(?key, "sorted tasks");
        Ok(())
    }

    /// Replaces the whole list and persists
    pub fn replace(&mut self, tasks: Vec<Task>) -> Result<(), StoreError> {
        let previous = std::mem::replace(&mut self.tasks, tasks);
        if let Err(err) = self.persist() {
            self.tasks = previous;
            return Err(err.into());
        }
        Ok(())
    }

    /// Saves the in-memory list; callers undo their change on failure
    fn persist(&self) -> Result<(), StorageError> {
        self.file.save(&self.tasks)
    }
}
