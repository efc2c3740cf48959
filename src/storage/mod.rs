//! # Storage Layer
//!
//! Persistence for the task list and its configuration.
//!
//! ## Storage Formats
//!
//! | Data | Format | Default location |
//! |------|--------|------------------|
//! | Tasks | JSON array of records | `./tasks.json` |
//! | Tasks (legacy) | `description\|0` per line | configured path |
//! | Config | TOML | `./todo.toml`, `~/.config/todo-cli/config.toml` |
//! | Exports | JSON or CSV | user-chosen path |
//!
//! ## Write Safety
//!
//! - Every mutation of [`TaskStore`] rewrites the whole backing file
//! - Writes are atomic (temp file + rename) under an exclusive `fs2` lock
//! - A corrupt backing file loads as an empty list with a warning
//!
//! ## Key Types
//!
//! - [`TaskStore`] - Ordered task list with add/remove/edit/toggle/sort
//! - [`TaskFile`] - Load/save contract, implemented by [`JsonFile`] and [`LineFile`]
//! - [`Config`] - Project and global configuration

mod config;
mod export;
mod file;
mod json;
mod lines;
mod store;

pub use config::{Config, ConfigError, ConfigFile, PROJECT_CONFIG_FILE};
pub use export::{export, export_csv, export_json, write_csv, ExportFormat, CSV_HEADER};
pub use file::{StorageError, StorageFormat, TaskFile};
pub use json::{to_json, JsonFile};
pub use lines::LineFile;
pub use store::{StoreError, TaskStore};
