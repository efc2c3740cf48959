//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat, Palette};
use super::shell::Shell;
use super::task;
use crate::domain::{FilterKind, Priority, SortKey};
use crate::storage::{Config, ExportFormat, StorageFormat, TaskStore};

#[derive(Parser)]
#[command(name = "todo")]
#[command(author, version, about = "A personal to-do list manager for the terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format for one-shot commands
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task file to use instead of the configured one
    #[arg(long, global = true, env = "TODO_FILE")]
    pub file: Option<PathBuf>,

    /// Task file format
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu
    Shell,

    /// Add a task
    Add {
        /// What needs doing
        description: String,

        /// high, medium or low (1-3)
        #[arg(long, short)]
        priority: Option<Priority>,

        /// Category name, or its number in the configured list
        #[arg(long, short)]
        category: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long, short)]
        due: Option<String>,
    },

    /// List all tasks
    #[command(visible_alias = "view")]
    List,

    /// Remove a task by number
    Remove {
        /// Task number as shown by `list`
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },

    /// Mark a task done, or undone if it already is
    Toggle {
        /// Task number as shown by `list`
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },

    /// Change fields of a task
    Edit {
        /// Task number as shown by `list`
        #[arg(allow_negative_numbers = true)]
        number: i64,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New priority
        #[arg(long, short)]
        priority: Option<Priority>,

        /// New category
        #[arg(long, short)]
        category: Option<String>,

        /// New due date (YYYY-MM-DD), or `none` to clear it
        #[arg(long, short)]
        due: Option<String>,
    },

    /// Search task descriptions (case-insensitive)
    Search {
        /// Keyword to look for
        keyword: String,
    },

    /// Show tasks matching a filter
    ///
    /// Examples:
    ///   todo filter pending
    ///   todo filter priority high
    ///   todo filter due 2025-06-30
    Filter {
        /// completed, pending, priority, category, due or keyword
        kind: FilterKind,

        /// Value for priority, category, due and keyword
        value: Option<String>,
    },

    /// Reorder the task list and save it
    Sort {
        /// priority, due, completion, alpha or created
        key: SortKey,
    },

    /// Write all tasks to a JSON or CSV file
    Export {
        /// Destination file
        path: PathBuf,

        /// Export format (inferred from the extension when omitted)
        #[arg(long = "as", value_enum)]
        export_as: Option<ExportFormat>,
    },
}

/// Installs the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(file) = cli.file {
        config.tasks_file = file;
    }
    if let Some(storage) = cli.storage {
        config.storage_format = storage;
    }
    if cli.no_color {
        config.color = false;
    }
    debug!(?config, "configuration loaded");

    let palette = Palette::new(config.color);
    let output = Output::new(cli.format, palette);

    let file = config.storage_format.open(&config.tasks_file);
    let mut store = TaskStore::open(file);

    match cli.command {
        None => run_shell(&mut store, &config, palette),
        Some(command) => {
            if let Some(warning) = store.load_warning() {
                output.warning(warning);
            }
            run_command(command, &mut store, &config, &output)
        }
    }
}

fn run_shell(store: &mut TaskStore, config: &Config, palette: Palette) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(store, config, palette, stdin.lock(), stdout.lock())
        .run()
        .context("Interactive session failed")
}

fn run_command(command: Commands, store: &mut TaskStore, config: &Config, output: &Output) -> Result<()> {
    match command {
        Commands::Shell => run_shell(store, config, output.palette()),
        Commands::Add {
            description,
            priority,
            category,
            due,
        } => task::add(
            store,
            config,
            output,
            &description,
            priority,
            category.as_deref(),
            due.as_deref(),
        ),
        Commands::List => task::list(store, output),
        Commands::Remove { number } => task::remove(store, output, number),
        Commands::Toggle { number } => task::toggle(store, output, number),
        Commands::Edit {
            number,
            description,
            priority,
            category,
            due,
        } => task::edit(
            store,
            config,
            output,
            number,
            description,
            priority,
            category.as_deref(),
            due.as_deref(),
        ),
        Commands::Search { keyword } => task::search(store, output, &keyword),
        Commands::Filter { kind, value } => task::filter(store, output, kind, value.as_deref()),
        Commands::Sort { key } => task::sort(store, output, key),
        Commands::Export { path, export_as } => task::export_to(store, output, &path, export_as),
    }
}
