//! Configuration handling
//!
//! Configuration is read from `todo.toml` in the working directory (project)
//! and `~/.config/todo-cli/config.toml` (global). Project values win over
//! global ones, and both win over the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::file::StorageFormat;
use crate::domain::{normalize_category, DEFAULT_CATEGORY};

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "todo.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// One configuration file as written on disk. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Backing file for the task list
    pub tasks_file: Option<PathBuf>,

    /// Backing file format
    pub storage_format: Option<StorageFormat>,

    /// Category for tasks added without one
    pub default_category: Option<String>,

    /// Categories offered by number when adding or editing
    pub categories: Option<Vec<String>>,

    /// Colored terminal output
    pub color: Option<bool>,
}

impl ConfigFile {
    /// Reads a config file, returning `None` if it does not exist
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(Some(file))
    }

    /// Fills unset keys from `lower`
    fn or(self, lower: ConfigFile) -> ConfigFile {
        ConfigFile {
            tasks_file: self.tasks_file.or(lower.tasks_file),
            storage_format: self.storage_format.or(lower.storage_format),
            default_category: self.default_category.or(lower.default_category),
            categories: self.categories.or(lower.categories),
            color: self.color.or(lower.color),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tasks_file: PathBuf,
    pub storage_format: StorageFormat,
    pub default_category: String,
    pub categories: Vec<String>,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from("tasks.json"),
            storage_format: StorageFormat::Json,
            default_category: DEFAULT_CATEGORY.to_string(),
            categories: ["Work", "Personal", "School", "Shopping", "Health", "Finance"]
                .into_iter()
                .map(String::from)
                .collect(),
            color: true,
        }
    }
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let dir = std::env::current_dir().context("Failed to determine working directory")?;
        Self::load_from(&dir, Self::global_config_path().as_deref())
    }

    /// Loads configuration with an explicit working directory and global file
    pub fn load_from(dir: &Path, global_path: Option<&Path>) -> Result<Self> {
        let global = match global_path {
            Some(path) => ConfigFile::read(path)?.unwrap_or_default(),
            None => ConfigFile::default(),
        };
        let project = ConfigFile::read(&dir.join(PROJECT_CONFIG_FILE))?.unwrap_or_default();

        let mut config = Self::resolve(project.or(global))?;
        if config.tasks_file.is_relative() {
            config.tasks_file = dir.join(&config.tasks_file);
        }
        Ok(config)
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "todo", "todo-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Applies defaults to unset keys and validates the result
    pub fn resolve(file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let categories: Vec<String> = file
            .categories
            .map(|list| {
                list.iter()
                    .map(|c| normalize_category(c))
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.categories);

        if categories.is_empty() {
            return Err(ConfigError::Invalid(
                "categories must contain at least one name".to_string(),
            ));
        }

        let default_category = match file.default_category {
            Some(c) => {
                let c = normalize_category(&c);
                if c.is_empty() {
                    return Err(ConfigError::Invalid(
                        "default_category cannot be empty".to_string(),
                    ));
                }
                c
            }
            None => defaults.default_category,
        };

        Ok(Self {
            tasks_file: file.tasks_file.unwrap_or(defaults.tasks_file),
            storage_format: file.storage_format.unwrap_or(defaults.storage_format),
            default_category,
            categories,
            color: file.color.unwrap_or(defaults.color),
        })
    }

    /// Looks up a category by its 1-based menu number
    pub fn category_by_number(&self, input: &str) -> Option<&str> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1)
            .and_then(|i| self.categories.get(i))
            .map(String::as_str)
    }
}
