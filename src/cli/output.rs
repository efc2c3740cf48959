//! Output formatting for CLI commands

use std::fmt::Display;

use crossterm::style::{Color, Stylize};
use serde::Serialize;
use tracing::warn;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Terminal colors, or plain text when disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that never emits escape codes
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn paint(&self, text: impl Display, color: Color) -> String {
        if self.enabled {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: impl Display) -> String {
        if self.enabled {
            text.to_string().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: impl Display) -> String {
        self.paint(text, Color::Green)
    }

    pub fn error(&self, text: impl Display) -> String {
        self.paint(text, Color::Red)
    }

    pub fn warning(&self, text: impl Display) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn heading(&self, text: impl Display) -> String {
        self.paint(text, Color::Cyan)
    }
}

/// Output helper for consistent formatting of one-shot commands
pub struct Output {
    format: OutputFormat,
    palette: Palette,
}

impl Output {
    pub fn new(format: OutputFormat, palette: Palette) -> Self {
        Self { format, palette }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", self.palette.success(message)),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints a warning (stderr, so it never mixes with data)
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Text => eprintln!("{}", self.palette.warning(format!("Warning: {}", message))),
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "warning": message
                    })
                );
            }
        }
    }

    /// Prints structured data (JSON format only, ignored in text mode)
    pub fn data<T: Serialize>(&self, data: &T) {
        if let Some(json) = self.render_data(data) {
            println!("{}", json);
        }
    }

    fn render_data<T: Serialize>(&self, data: &T) -> Option<String> {
        if self.format != OutputFormat::Json {
            return None;
        }
        match serde_json::to_string(data) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, "failed to serialize command output");
                None
            }
        }
    }

    /// Prints plain text (text format only, ignored in JSON mode)
    pub fn text(&self, text: &str) {
        if self.format == OutputFormat::Text {
            print!("{}", text);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
