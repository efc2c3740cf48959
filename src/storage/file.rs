//! Backing file abstraction
//!
//! A [`TaskFile`] reads and writes the whole task list. Two formats exist:
//! structured JSON (the default) and the legacy line format.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::json::JsonFile;
use super::lines::LineFile;
use crate::domain::Task;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Task file {} is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write CSV to {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and writes the full task list
pub trait TaskFile {
    /// Returns the path of the backing file
    fn path(&self) -> &Path;

    /// Reads every task in file order
    ///
    /// A missing file is an empty list, not an error.
    fn load(&self) -> Result<Vec<Task>, StorageError>;

    /// Replaces the file content with `tasks`
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Backing file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StorageFormat {
    /// JSON array of task records, keeps every field
    #[default]
    Json,
    /// `description|0` per line, keeps only description and completion
    Lines,
}

impl StorageFormat {
    /// Opens a backing file of this format at `path`
    pub fn open(self, path: impl Into<PathBuf>) -> Box<dyn TaskFile> {
        match self {
            StorageFormat::Json => Box::new(JsonFile::new(path)),
            StorageFormat::Lines => Box::new(LineFile::new(path)),
        }
    }
}

/// Reads a file to a string, treating a missing file as `None`
///
/// Content that is not valid UTF-8 is reported as corrupt.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        Err(e) => Err(StorageError::io(path, e)),
    }
}

/// Writes `content` to `path` via a temp file and rename
///
/// Readers see either the old content or the new content, never a mix.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| StorageError::io(&temp_path, e))?;

        file.lock_exclusive()
            .map_err(|e| StorageError::io(&temp_path, e))?;

        let mut writer = BufWriter::new(&file);
        writer
            .write_all(content)
            .and_then(|_| writer.flush())
            .map_err(|e| StorageError::io(&temp_path, e))?;

        // Lock is released when file is dropped
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::io(path, e)
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
