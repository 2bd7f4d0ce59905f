//
//  releasehub-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Formatting
//!
//! Unified output handling for the CLI. Commands render through an
//! [`OutputWriter`], which dispatches to the table renderer for interactive
//! use or to JSON for scripting (`--json`).

pub mod json;
pub mod table;

pub use json::{write_json, write_json_compact};
pub use table::{create_table, format_bool, TableBuilder};

use console::style;
use serde::Serialize;

/// Available output formats for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    /// Human-readable table format with optional color support.
    #[default]
    Table,
    /// JSON format for scripting and automation. Pretty-printed.
    Json,
}

/// A unified output writer that handles multiple output formats.
///
/// Color output is automatically detected based on terminal capabilities
/// and disabled when output is piped or redirected.
///
/// # Example
///
/// ```rust,ignore
/// let writer = OutputWriter::table();
/// writer.write_list(&windows)?;
/// writer.write_success("Release window frozen");
/// ```
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer with the given format and auto-detected color.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Creates a table-format writer.
    pub fn table() -> Self {
        Self::new(OutputFormat::Table)
    }

    /// Creates a JSON-format writer.
    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    /// Whether color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Writes a single value using the configured format.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Table => {
                value.print_table(self.color);
                Ok(())
            }
        }
    }

    /// Writes a list of values using the configured format.
    ///
    /// For JSON the entire list is serialized as one array; for tables each
    /// value renders individually.
    pub fn write_list<T: Serialize + TableOutput>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&values),
            OutputFormat::Table => {
                for value in values {
                    value.print_table(self.color);
                }
                Ok(())
            }
        }
    }

    /// Writes an error message to stderr, prefixed with `error:`.
    pub fn write_error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    /// Writes a warning message to stderr, prefixed with `warning:`.
    pub fn write_warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    /// Writes a success message to stdout, prefixed with a check mark.
    pub fn write_success(&self, msg: &str) {
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }

    /// Writes an informational message to stdout.
    pub fn write_info(&self, msg: &str) {
        if self.color {
            println!("{} {}", style("ℹ").blue().bold(), msg);
        } else {
            println!("i {}", msg);
        }
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::table()
    }
}

/// Types that can render themselves as terminal tables.
///
/// Implementations should be mindful of terminal width and truncate long
/// values; use [`crate::util::truncate`] for cells that can grow.
pub trait TableOutput {
    /// Renders the type as a table row or section.
    ///
    /// `color` tells the implementation whether styling is enabled.
    fn print_table(&self, color: bool);
}

impl<T: TableOutput> TableOutput for &T {
    fn print_table(&self, color: bool) {
        (*self).print_table(color);
    }
}

/// Prints a dimmed `key: value` line, as used by detail screens.
pub fn print_field(key: &str, value: &str, color: bool) {
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}
