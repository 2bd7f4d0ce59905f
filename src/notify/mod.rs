//
//  releasehub-cli
//  notify/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Transient Error Notifier
//!
//! The console equivalent of a toast: the single user-visible outlet for
//! errors that are handled rather than propagated (most prominently the
//! list state machine's swallowed fetch failures).
//!
//! Messages are formatted as `message (traceId: ...)` and identical messages
//! are suppressed inside a two-second window, so rapid repeated failures
//! (say, a poll loop hitting a dead backend) produce one line instead of a
//! stream.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use console::style;
use once_cell::sync::Lazy;

use crate::api::http::ApiError;

/// Window inside which identical notifications are suppressed.
const DEDUP_WINDOW: Duration = Duration::from_secs(2);

/// Deduplicating notification sink.
///
/// Usually used through the module-level [`notify_api_error`] /
/// [`handle_error`] functions, which share one global instance; standalone
/// instances exist for tests.
pub struct Notifier {
    last_key: String,
    last_at: Option<Instant>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// A notifier with an empty dedup window.
    pub fn new() -> Self {
        Self {
            last_key: String::new(),
            last_at: None,
        }
    }

    /// Emits a notification unless an identical one was just shown.
    ///
    /// Returns whether the notification was actually emitted (`false` when
    /// it was deduplicated).
    pub fn notify(&mut self, message: &str, trace_id: Option<&str>) -> bool {
        let key = format!("{message}|{}", trace_id.unwrap_or(""));
        let now = Instant::now();

        if let Some(last_at) = self.last_at {
            if now.duration_since(last_at) < DEDUP_WINDOW && key == self.last_key {
                return false;
            }
        }

        self.last_key = key;
        self.last_at = Some(now);

        let trace_suffix = trace_id
            .map(|trace_id| format!(" (traceId: {trace_id})"))
            .unwrap_or_default();
        eprintln!("{} {message}{trace_suffix}", style("error:").red().bold());
        true
    }
}

static NOTIFIER: Lazy<Mutex<Notifier>> = Lazy::new(|| Mutex::new(Notifier::new()));

/// Surfaces an [`ApiError`] through the global notifier.
pub fn notify_api_error(err: &ApiError) {
    if let Ok(mut notifier) = NOTIFIER.lock() {
        notifier.notify(&err.message, err.trace_id.as_deref());
    }
}

/// Surfaces any error through the global notifier.
///
/// [`ApiError`]s keep their trace id; everything else is shown by message
/// alone.
pub fn handle_error(err: &anyhow::Error) {
    match err.downcast_ref::<ApiError>() {
        Some(api) => notify_api_error(api),
        None => {
            if let Ok(mut notifier) = NOTIFIER.lock() {
                notifier.notify(&err.to_string(), None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_messages_are_deduplicated() {
        let mut notifier = Notifier::new();
        assert!(notifier.notify("boom", Some("t-1")));
        assert!(!notifier.notify("boom", Some("t-1")));
    }

    #[test]
    fn different_trace_ids_are_not_deduplicated() {
        let mut notifier = Notifier::new();
        assert!(notifier.notify("boom", Some("t-1")));
        assert!(notifier.notify("boom", Some("t-2")));
    }

    #[test]
    fn different_messages_are_not_deduplicated() {
        let mut notifier = Notifier::new();
        assert!(notifier.notify("boom", None));
        assert!(notifier.notify("bang", None));
    }
}
