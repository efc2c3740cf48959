//! # Command-Line Interface
//!
//! The interactive menu and the one-shot subcommands built on the same store.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | *(none)*, `shell` | Interactive menu loop |
//! | `add`, `edit`, `remove`, `toggle` | Change the task list |
//! | `list` (`view`), `search`, `filter` | Read the task list |
//! | `sort` | Reorder and save the list |
//! | `export` | Write a JSON or CSV copy |
//!
//! ## Output Formats
//!
//! One-shot commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logs on stderr; `RUST_LOG` overrides it:
//! ```bash
//! todo --verbose list
//! RUST_LOG=todo_cli=info todo add "Water plants"
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod render;
mod shell;
mod task;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat, Palette};
pub use shell::Shell;
