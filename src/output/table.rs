//
//  releasehub-cli
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Table rendering helpers built on `comfy_table`.
//!
//! Tables use UTF-8 box-drawing characters with dynamic content arrangement
//! so they adapt to the terminal width.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a new styled table with the default presets.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Builder for constructing formatted tables with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// TableBuilder::new()
///     .headers(["KEY", "STATUS"])
///     .row(["2026-03-regular", "OPEN"])
///     .print();
/// ```
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    /// Creates a builder with color auto-detection.
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Overrides color detection (e.g. for piped output).
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Sets the header row; headers render in cyan when color is enabled.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.color {
            let cells: Vec<Cell> = headers
                .into_iter()
                .map(|header| Cell::new(header.into()).fg(Color::Cyan))
                .collect();
            self.table.set_header(cells);
        } else {
            let cells: Vec<String> = headers.into_iter().map(Into::into).collect();
            self.table.set_header(cells);
        }
        self
    }

    /// Appends one data row.
    pub fn row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<String> = row.into_iter().map(Into::into).collect();
        self.table.add_row(cells);
        self
    }

    /// Renders the table to stdout.
    pub fn print(self) {
        println!("{}", self.table);
    }
}

/// Formats a boolean as `yes`/`no` for table cells.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_rows() {
        let builder = TableBuilder::new()
            .color(false)
            .headers(["A", "B"])
            .row(["1", "2"])
            .row(["3", "4"]);
        let rendered = builder.table.to_string();
        assert!(rendered.contains('1'));
        assert!(rendered.contains('4'));
    }

    #[test]
    fn booleans_format_as_words() {
        assert_eq!(format_bool(true), "yes");
        assert_eq!(format_bool(false), "no");
    }
}
