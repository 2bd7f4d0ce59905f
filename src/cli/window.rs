//
//  releasehub-cli
//  cli/window.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Release-window commands.
//!
//! The window screen is the busiest one: paged list, full-page create and
//! configure forms, the freeze/unfreeze/publish/close lifecycle, and
//! attaching/detaching iterations.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::common::{PageQuery, PageResult};
use crate::api::http::{ApiClient, ApiError};
use crate::api::iterations::{self, IterationFilter};
use crate::api::release_windows::{
    self, ConfigureReleaseWindowReq, CreateReleaseWindowReq, ReleaseWindowFilter,
    ReleaseWindowStatus, ReleaseWindowView,
};
use crate::crud::{
    CrudBackend, CrudMode, DetailForm, ListPage, ListPageOptions, PageFetcher,
};
use crate::interactive::{prompt_input, prompt_select};
use crate::output::TableOutput;
use crate::util::{format_timestamp, value_or_dash};

use super::{output_writer, progress_spinner, CommandContext, GlobalOptions};

const ROUTE: &str = "/release-windows";

/// Manage release windows
#[derive(Args, Debug)]
pub struct WindowCommand {
    #[command(subcommand)]
    pub command: WindowSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WindowSubcommand {
    /// List release windows
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View one release window
    View(IdArgs),

    /// Create a release window
    Create(CreateArgs),

    /// Configure the window's start/end range
    Configure(ConfigureArgs),

    /// Freeze the window
    Freeze(IdArgs),

    /// Unfreeze the window
    Unfreeze(IdArgs),

    /// Publish the window
    Publish(IdArgs),

    /// Close the window
    Close(IdArgs),

    /// Mount an iteration onto the window
    Attach(AttachArgs),

    /// Unmount the window's iteration
    Detach(IdArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by window name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Filter by status (DRAFT, INIT, OPEN, FROZEN, CLOSED, PUBLISHED)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page
    #[arg(long = "page-size", default_value = "10")]
    pub page_size: u32,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Release window id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Window key, e.g. 2026-03-regular (prompted when omitted)
    #[arg(long)]
    pub key: Option<String>,

    /// Display name (prompted when omitted)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Release window id
    pub id: String,

    /// Window start, RFC 3339
    #[arg(long)]
    pub start: String,

    /// Window end, RFC 3339
    #[arg(long)]
    pub end: String,
}

#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Release window id
    pub id: String,

    /// Iteration key (selected interactively when omitted)
    #[arg(long)]
    pub iteration: Option<String>,
}

struct WindowFetcher {
    client: Arc<ApiClient>,
}

#[async_trait]
impl PageFetcher<ReleaseWindowView, ReleaseWindowFilter> for WindowFetcher {
    async fn fetch_page(
        &self,
        query: &PageQuery<ReleaseWindowFilter>,
    ) -> Result<PageResult<ReleaseWindowView>, ApiError> {
        release_windows::list(&self.client, query).await
    }
}

/// Form backend for the full-page window editor.
///
/// Create posts the key/name pair; update maps the form onto the configure
/// call, which is the only mutable shape the backend exposes for an
/// existing window.
struct WindowBackend {
    client: Arc<ApiClient>,
}

#[async_trait]
impl CrudBackend<ReleaseWindowView> for WindowBackend {
    async fn fetch_by_id(&self, id: &str) -> Result<ReleaseWindowView, ApiError> {
        release_windows::get(&self.client, id).await
    }

    async fn create(&self, form: &ReleaseWindowView) -> Result<ReleaseWindowView, ApiError> {
        release_windows::create(
            &self.client,
            &CreateReleaseWindowReq {
                window_key: form.window_key.clone(),
                name: form.name.clone(),
            },
        )
        .await
    }

    async fn update(&self, id: &str, form: &ReleaseWindowView) -> Result<ReleaseWindowView, ApiError> {
        release_windows::configure(
            &self.client,
            id,
            &ConfigureReleaseWindowReq {
                start_at: form.start_at.clone().unwrap_or_default(),
                end_at: form.end_at.clone().unwrap_or_default(),
            },
        )
        .await
    }
}

#[derive(Debug, Serialize)]
struct WindowRow {
    id: String,
    key: String,
    name: String,
    status: String,
    frozen: bool,
    created: String,
}

impl From<&ReleaseWindowView> for WindowRow {
    fn from(window: &ReleaseWindowView) -> Self {
        Self {
            id: window.id.clone(),
            key: window.window_key.clone(),
            name: window.name.clone(),
            status: window.status.to_string(),
            frozen: window.frozen,
            created: format_timestamp(&window.created_at),
        }
    }
}

impl TableOutput for WindowRow {
    fn print_table(&self, color: bool) {
        let status = if color {
            match self.status.as_str() {
                "OPEN" => style(self.status.clone()).green().to_string(),
                "FROZEN" => style(self.status.clone()).cyan().to_string(),
                "PUBLISHED" => style(self.status.clone()).magenta().to_string(),
                "CLOSED" => style(self.status.clone()).dim().to_string(),
                _ => self.status.clone(),
            }
        } else {
            self.status.clone()
        };
        println!(
            "{:<8} {:<20} {:<24} {:<10} {}",
            self.id, self.key, self.name, status, self.created
        );
    }
}

impl WindowCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            WindowSubcommand::List(args) => self.list(args, global).await,
            WindowSubcommand::View(args) => self.view(args, global).await,
            WindowSubcommand::Create(args) => self.create(args, global).await,
            WindowSubcommand::Configure(args) => self.configure(args, global).await,
            WindowSubcommand::Freeze(args) => self.lifecycle(args, global, "freeze").await,
            WindowSubcommand::Unfreeze(args) => self.lifecycle(args, global, "unfreeze").await,
            WindowSubcommand::Publish(args) => self.lifecycle(args, global, "publish").await,
            WindowSubcommand::Close(args) => self.lifecycle(args, global, "close").await,
            WindowSubcommand::Attach(args) => self.attach(args, global).await,
            WindowSubcommand::Detach(args) => self.detach(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let status = match args.status.as_deref() {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };

        let fetcher = Arc::new(WindowFetcher {
            client: ctx.client.clone(),
        });
        let mut page = ListPage::new(ListPageOptions::new(
            fetcher,
            ReleaseWindowFilter {
                name: args.name.clone(),
                status,
            },
        ));
        page.query.page = args.page;
        page.query.page_size = args.page_size;

        let spinner = progress_spinner(global, "Loading release windows...");
        page.mount().await;
        spinner.finish_and_clear();
        ctx.check_session()?;

        let writer = output_writer(global);
        let rows: Vec<WindowRow> = page.list.iter().map(WindowRow::from).collect();
        if !global.json && !rows.is_empty() {
            println!(
                "{:<8} {:<20} {:<24} {:<10} {}",
                "ID", "KEY", "NAME", "STATUS", "CREATED"
            );
        }
        writer.write_list(&rows)?;
        if !global.json {
            writer.write_info(&format!(
                "page {}: {} of {} window(s)",
                page.query.page,
                page.list.len(),
                page.total
            ));
        }
        Ok(())
    }

    /// Inspect one window through the read-only detail form.
    async fn view(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let backend = Arc::new(WindowBackend {
            client: ctx.client.clone(),
        });
        let mut detail = DetailForm::new(backend, ReleaseWindowView::default());

        if !detail.load(args.id.clone(), CrudMode::View).await {
            ctx.check_session()?;
            anyhow::bail!("release window {} could not be loaded", args.id);
        }

        let writer = output_writer(global);
        if global.json {
            crate::output::write_json(&detail.form)?;
            return Ok(());
        }
        let window = &detail.form;
        crate::output::print_field("id", &window.id, writer.color());
        crate::output::print_field("key", &window.window_key, writer.color());
        crate::output::print_field("name", &window.name, writer.color());
        crate::output::print_field("status", &window.status.to_string(), writer.color());
        crate::output::print_field(
            "frozen",
            crate::output::format_bool(window.frozen),
            writer.color(),
        );
        crate::output::print_field(
            "start",
            &value_or_dash(window.start_at.as_deref()),
            writer.color(),
        );
        crate::output::print_field(
            "end",
            &value_or_dash(window.end_at.as_deref()),
            writer.color(),
        );
        crate::output::print_field(
            "published",
            &value_or_dash(window.published_at.as_deref()),
            writer.color(),
        );
        Ok(())
    }

    /// Create a window through the full-page form flow.
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("release-window:write")?;

        let key = match &args.key {
            Some(key) => key.clone(),
            None if global.no_prompt => anyhow::bail!("--key is required with --no-prompt"),
            None => prompt_input("Window key")?,
        };
        let name = match &args.name {
            Some(name) => name.clone(),
            None if global.no_prompt => anyhow::bail!("--name is required with --no-prompt"),
            None => prompt_input("Display name")?,
        };

        let backend = Arc::new(WindowBackend {
            client: ctx.client.clone(),
        });
        let mut form = DetailForm::new(backend, ReleaseWindowView::default());
        form.reset();
        form.form.window_key = key;
        form.form.name = name;

        ctx.surface_any(form.submit().await)?;
        output_writer(global)
            .write_success(&format!("release window {} created", form.form.window_key));
        Ok(())
    }

    /// Configure the start/end range through the edit form flow.
    async fn configure(&self, args: &ConfigureArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("release-window:write")?;

        let backend = Arc::new(WindowBackend {
            client: ctx.client.clone(),
        });
        let mut form = DetailForm::new(backend, ReleaseWindowView::default());
        if !form.load(args.id.clone(), CrudMode::Edit).await {
            ctx.check_session()?;
            anyhow::bail!("release window {} could not be loaded", args.id);
        }

        form.form.start_at = Some(args.start.clone());
        form.form.end_at = Some(args.end.clone());
        ctx.surface_any(form.submit().await)?;

        output_writer(global).write_success(&format!(
            "release window {} configured: {} → {}",
            args.id, args.start, args.end
        ));
        Ok(())
    }

    /// Shared freeze/unfreeze/publish/close handler.
    async fn lifecycle(&self, args: &IdArgs, global: &GlobalOptions, action: &str) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("release-window:write")?;

        let call = match action {
            "freeze" => release_windows::freeze(&ctx.client, &args.id).await,
            "unfreeze" => release_windows::unfreeze(&ctx.client, &args.id).await,
            "publish" => release_windows::publish(&ctx.client, &args.id).await,
            _ => release_windows::close(&ctx.client, &args.id).await,
        };
        let window = ctx.surface(call)?;

        output_writer(global).write_success(&format!(
            "release window {} is now {}",
            window.window_key, window.status
        ));
        Ok(())
    }

    async fn attach(&self, args: &AttachArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("release-window:write")?;

        let iteration_key = match &args.iteration {
            Some(key) => key.clone(),
            None if global.no_prompt => anyhow::bail!("--iteration is required with --no-prompt"),
            None => {
                // Offer the first page of iterations to pick from.
                let candidates = ctx.surface(
                    iterations::list(&ctx.client, &PageQuery::new(IterationFilter::default()))
                        .await,
                )?;
                if candidates.list.is_empty() {
                    anyhow::bail!("no iterations available to attach");
                }
                let keys: Vec<String> = candidates
                    .list
                    .iter()
                    .map(|iteration| iteration.iteration_key.clone())
                    .collect();
                let index = prompt_select("Iteration", &keys)?;
                keys[index].clone()
            }
        };

        let window =
            ctx.surface(release_windows::attach(&ctx.client, &args.id, &iteration_key).await)?;
        output_writer(global).write_success(&format!(
            "iteration {} attached to window {}",
            iteration_key, window.window_key
        ));
        Ok(())
    }

    async fn detach(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("release-window:write")?;

        let window = ctx.surface(release_windows::detach(&ctx.client, &args.id).await)?;
        output_writer(global)
            .write_success(&format!("iteration detached from window {}", window.window_key));
        Ok(())
    }
}

fn parse_status(raw: &str) -> Result<ReleaseWindowStatus> {
    let status = match raw.to_uppercase().as_str() {
        "DRAFT" => ReleaseWindowStatus::Draft,
        "INIT" => ReleaseWindowStatus::Init,
        "OPEN" => ReleaseWindowStatus::Open,
        "FROZEN" => ReleaseWindowStatus::Frozen,
        "CLOSED" => ReleaseWindowStatus::Closed,
        "PUBLISHED" => ReleaseWindowStatus::Published,
        other => anyhow::bail!(
            "unknown status '{other}' (expected DRAFT, INIT, OPEN, FROZEN, CLOSED, or PUBLISHED)"
        ),
    };
    Ok(status)
}
