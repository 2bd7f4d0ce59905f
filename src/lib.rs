//
//  releasehub-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # ReleaseHub CLI Library
//!
//! A command-line administration console for the ReleaseHub release-management
//! service, exposing iterations, repositories, release windows, branch rules,
//! version policies, and run history from the terminal.
//!
//! ## Overview
//!
//! This library provides the core functionality for the `rh` CLI tool. All
//! backend communication goes through a single typed HTTP client that unwraps
//! the service's response envelope, injects the bearer token, and collapses
//! every failure mode into one application error type. On top of that client
//! sit three reusable CRUD state machines (paged list, dialog form, detail
//! form) that every console screen instantiates.
//!
//! ## Features
//!
//! - **Typed REST client**: envelope unwrapping, bearer-token injection,
//!   centralized error classification, session-expiry handling
//! - **CRUD building blocks**: generic paged-list, dialog-form, and
//!   detail-form state machines shared by all screens
//! - **Session management**: durable token storage via the system keyring,
//!   profile and permission state refetched per session
//! - **Route guard**: one ordered predicate chain deciding screen admission
//! - **Interactive & Scriptable**: prompt-driven forms with JSON output for
//!   automation
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: HTTP client, envelope/error model, and per-entity resource clients
//! - [`crud`]: Generic list/dialog/detail CRUD state machines
//! - [`session`]: Session store and durable token storage
//! - [`router`]: Route table, navigator seam, and the auth guard
//! - [`notify`]: Deduplicated transient error notifier
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON)
//! - [`interactive`]: Interactive prompts and selectors
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use releasehub_cli::api::http::ApiClient;
//! use releasehub_cli::router::RouteState;
//! use releasehub_cli::session::SessionStore;
//!
//! let session = Arc::new(SessionStore::in_memory());
//! let route = Arc::new(RouteState::new("/iterations"));
//! let client = ApiClient::new("http://localhost:8080", session, route)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the
/// clap derive API. The command modules are the "views" of the console: they
/// consume the CRUD state machines and resource clients, and render through
/// the output writers.
pub mod cli;

/// API client and resource clients.
///
/// This module provides:
/// - The single HTTP choke point ([`api::http::ApiClient`]) with envelope
///   unwrapping and error classification
/// - Pagination types shared by all paged endpoints
/// - One resource-client module per entity (iterations, release windows,
///   repositories, runs, branch rules, version policies, auth)
pub mod api;

/// Generic CRUD state machines.
///
/// The three interaction patterns every screen instantiates:
/// - [`crud::ListPage`]: paged list with search/reset/pagination
/// - [`crud::DialogForm`]: modal create/edit/view flow
/// - [`crud::DetailForm`]: full-page create/edit/view flow
pub mod crud;

/// Session state and durable token storage.
///
/// Holds the bearer token (persisted via the system keyring), the user
/// profile, and the permission list. Implements the session seam read by the
/// HTTP client for token injection and forced logout.
pub mod session;

/// Route table, navigator seam, and auth guard.
///
/// Screens are addressed by SPA-style route paths. The guard runs one ordered
/// predicate chain (login redirect, public routes, token presence, profile
/// fetch) before a screen is admitted.
pub mod router;

/// Deduplicated transient error notifier.
///
/// The console equivalent of a toast: errors surfaced here are printed once,
/// with identical messages suppressed inside a short window.
pub mod notify;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/rh/config.toml`
/// - macOS: `~/Library/Application Support/rh/config.toml`
/// - Windows: `%APPDATA%\rh\config.toml`
pub mod config;

/// Output formatting for different modes.
///
/// Provides formatters for:
/// - Table format: Human-readable tables for interactive use
/// - JSON format: Structured output for scripting and automation
pub mod output;

/// Interactive terminal UI components.
///
/// Provides interactive prompts and selection helpers for:
/// - Text input with optional defaults
/// - Password input (masked)
/// - Confirmations and single-select menus
pub mod interactive;

/// Utility functions and helpers.
///
/// Common utilities used throughout the codebase including timestamp
/// formatting and string truncation for table cells.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
///
/// The [`Cli`] struct represents the root command and is the entry point
/// for parsing command-line arguments.
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
///
/// # Value
///
/// `"rh"`
pub const APP_NAME: &str = "rh";

/// Application version constant.
///
/// The current version of the CLI, automatically derived from Cargo.toml
/// at compile time using the `CARGO_PKG_VERSION` environment variable.
///
/// # Example
///
/// ```rust
/// use releasehub_cli::VERSION;
///
/// println!("rh version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    pub const USAGE: i32 = 2;

    /// Authentication required or failed.
    ///
    /// The user is not authenticated or the stored token is no longer valid.
    /// Run `rh auth login` to authenticate.
    pub const AUTH_ERROR: i32 = 4;
}
