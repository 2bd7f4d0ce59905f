//
//  releasehub-cli
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Utility functions shared across the CLI.

use chrono::{DateTime, Local};

/// Truncates a string to a maximum display length, appending `...` when cut.
///
/// # Example
///
/// ```rust
/// use releasehub_cli::util::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// ```
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{cut}...")
}

/// Formats an RFC 3339 timestamp for table display in local time.
///
/// Unparseable or missing values pass through unchanged so raw backend
/// data is never hidden.
pub fn format_timestamp(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => value.to_string(),
    }
}

/// Renders an optional value for a table cell, dashing out `None`.
pub fn value_or_dash(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_format_timestamp_passthrough() {
        assert_eq!(format_timestamp("not-a-date"), "not-a-date");
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn test_format_timestamp_parses_rfc3339() {
        let formatted = format_timestamp("2026-03-01T10:30:00Z");
        assert!(formatted.starts_with("2026-03-01") || formatted.starts_with("2026-02-28"));
        assert!(!formatted.contains('T'));
    }

    #[test]
    fn test_value_or_dash() {
        assert_eq!(value_or_dash(Some("x")), "x");
        assert_eq!(value_or_dash(Some("")), "-");
        assert_eq!(value_or_dash(None), "-");
    }
}
