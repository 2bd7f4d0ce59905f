//
//  releasehub-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros.
//!
//! The command modules are the console's screens: each one wires the CRUD
//! state machines and resource clients together and renders through the
//! output writers. Shared plumbing lives in [`CommandContext`].

mod auth;
mod completion;
mod config;
mod iteration;
mod policy;
mod repo;
mod rule;
mod run;
mod window;

pub use auth::AuthCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use iteration::IterationCommand;
pub use policy::PolicyCommand;
pub use repo::RepoCommand;
pub use rule::RuleCommand;
pub use run::RunCommand;
pub use window::WindowCommand;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;

use crate::api::http::{ApiClient, ApiError};
use crate::config::Config;
use crate::output::{OutputFormat, OutputWriter};
use crate::router::{self, Admission, RouteState};
use crate::session::{KeyringTokenStore, SessionStore};

/// ReleaseHub CLI - Administer releases from the command line
#[derive(Parser, Debug)]
#[command(
    name = "rh",
    version,
    about = "Administer ReleaseHub from the command line",
    long_about = "rh is a CLI for the ReleaseHub release-management service.\n\n\
                  It brings iterations, release windows, repositories, branch rules,\n\
                  version policies, and run history to your terminal.",
    propagate_version = true,
    after_help = "Use 'rh <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// ReleaseHub backend origin (overrides the configured base URL)
    #[arg(long, global = true, env = "RH_HOST")]
    pub host: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long, global = true, env = "RH_NO_PROMPT")]
    pub no_prompt: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with ReleaseHub
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Manage iterations
    #[command(visible_alias = "it")]
    Iteration(IterationCommand),

    /// Manage release windows
    #[command(visible_alias = "win")]
    Window(WindowCommand),

    /// Manage repositories
    Repo(RepoCommand),

    /// Inspect run history
    Run(RunCommand),

    /// Manage branch rules
    Rule(RuleCommand),

    /// Manage version policies
    Policy(PolicyCommand),

    /// Read and write CLI configuration
    Config(ConfigCommand),

    /// Generate shell completions
    Completion(CompletionCommand),

    /// Print version information
    Version,
}

/// Shared per-command plumbing: config, session, route state, HTTP client.
///
/// Every screen opens a context for its route; [`open`](Self::open) runs the
/// route guard, so unauthenticated invocations fail with a login hint before
/// any domain call is made.
pub struct CommandContext {
    /// Loaded configuration.
    pub config: Config,
    /// Session store backing the client's token reads.
    pub session: Arc<SessionStore>,
    /// Navigation state shared with the client.
    pub route: Arc<RouteState>,
    /// The HTTP client.
    pub client: Arc<ApiClient>,
}

impl CommandContext {
    /// Builds the context and runs the route guard for the screen.
    pub async fn open(global: &GlobalOptions, route_path: &str) -> Result<Self> {
        let ctx = Self::connect(global, route_path)?;
        match router::admit(route_path, &ctx.session, &ctx.client).await {
            Admission::Proceed | Admission::RedirectHome => Ok(ctx),
            Admission::RedirectLogin { redirect } => {
                anyhow::bail!(
                    "not authenticated; run 'rh auth login' first (you will land back on {redirect})"
                )
            }
        }
    }

    /// Builds the context without running the guard (login screen only).
    pub fn connect(global: &GlobalOptions, route_path: &str) -> Result<Self> {
        let config = Config::load()?;
        let base_url = global
            .host
            .clone()
            .unwrap_or_else(|| config.base_url());
        let perm_mode = config.perm_mode();
        let session = Arc::new(SessionStore::load(
            Box::new(KeyringTokenStore::new()),
            perm_mode,
        ));
        let route = Arc::new(RouteState::new(route_path));
        let client = Arc::new(ApiClient::new(&base_url, session.clone(), route.clone())?);
        Ok(Self {
            config,
            session,
            route,
            client,
        })
    }

    /// Fails with a login hint when the client bounced the route to login.
    ///
    /// List fetches swallow their errors, so after driving a list the screen
    /// asks the route state whether a session expiry happened mid-call.
    pub fn check_session(&self) -> Result<()> {
        if !self.route.on_login() {
            return Ok(());
        }
        match self.route.redirect_target() {
            Some(redirect) => anyhow::bail!(
                "session expired; run 'rh auth login' to continue (you will land back on {redirect})"
            ),
            None => anyhow::bail!("session expired; run 'rh auth login' to continue"),
        }
    }

    /// Surfaces an API result, translating a session-expiry redirect into a
    /// login hint.
    ///
    /// When the client bounced the route to login mid-call, the original
    /// error is about an expired token; tell the user what to do and where
    /// they will land afterwards.
    pub fn surface<T>(&self, result: Result<T, ApiError>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                self.check_session()?;
                Err(err.into())
            }
        }
    }

    /// [`surface`](Self::surface) for results that already went through a
    /// state machine (which wraps failures in `anyhow`).
    pub fn surface_any<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                self.check_session()?;
                Err(err)
            }
        }
    }

    /// Fails unless the session grants the permission.
    pub fn require_perm(&self, required: &str) -> Result<()> {
        if self.session.has_permission(Some(required)) {
            Ok(())
        } else {
            anyhow::bail!("permission denied: this action requires '{required}'")
        }
    }
}

/// Picks the output format for a command invocation.
pub fn output_writer(global: &GlobalOptions) -> OutputWriter {
    if global.json {
        OutputWriter::new(OutputFormat::Json)
    } else {
        OutputWriter::new(OutputFormat::Table)
    }
}

/// Spawns a spinner for a fetch; call `finish_and_clear` when done.
///
/// Suppressed in JSON mode so piped output stays clean.
pub fn progress_spinner(global: &GlobalOptions, message: &str) -> ProgressBar {
    if global.json {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
