//
//  releasehub-cli
//  cli/iteration.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Iteration commands.
//!
//! The list screen pages through iterations; create runs the dialog-form
//! flow; add-repos/remove-repos mount repositories onto an iteration.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::common::{PageQuery, PageResult};
use crate::api::http::{ApiClient, ApiError};
use crate::api::iterations::{
    self, CreateIterationRequest, Iteration, IterationFilter, UpdateIterationRequest,
};
use crate::crud::{CrudBackend, DialogForm, ListPage, ListPageOptions, OpenOptions, PageFetcher};
use crate::interactive::{prompt_confirm, prompt_input};
use crate::output::TableOutput;
use crate::util::value_or_dash;

use super::{output_writer, progress_spinner, CommandContext, GlobalOptions};

const ROUTE: &str = "/iterations";

/// Manage iterations
#[derive(Args, Debug)]
pub struct IterationCommand {
    #[command(subcommand)]
    pub command: IterationSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IterationSubcommand {
    /// List iterations
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View one iteration
    View(KeyArgs),

    /// Create an iteration
    Create(CreateArgs),

    /// Delete an iteration
    Delete(KeyArgs),

    /// Attach repositories to an iteration
    AddRepos(ReposArgs),

    /// Detach repositories from an iteration
    RemoveRepos(ReposArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by keyword
    #[arg(long, short = 'k')]
    pub keyword: Option<String>,

    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page
    #[arg(long = "page-size", default_value = "10")]
    pub page_size: u32,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Iteration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Key of the new iteration (prompted when omitted)
    pub key: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReposArgs {
    /// Iteration key
    pub key: String,

    /// Repository slugs, e.g. org/service-api
    #[arg(required = true)]
    pub repos: Vec<String>,
}

/// List-page fetcher backed by the iterations resource client.
struct IterationFetcher {
    client: Arc<ApiClient>,
}

#[async_trait]
impl PageFetcher<Iteration, IterationFilter> for IterationFetcher {
    async fn fetch_page(
        &self,
        query: &PageQuery<IterationFilter>,
    ) -> Result<PageResult<Iteration>, ApiError> {
        iterations::list(&self.client, query).await
    }
}

/// Form backend adapting the resource client's request shapes.
struct IterationBackend {
    client: Arc<ApiClient>,
}

#[async_trait]
impl CrudBackend<Iteration> for IterationBackend {
    async fn fetch_by_id(&self, id: &str) -> Result<Iteration, ApiError> {
        iterations::get(&self.client, id).await
    }

    async fn create(&self, form: &Iteration) -> Result<Iteration, ApiError> {
        iterations::create(
            &self.client,
            &CreateIterationRequest {
                iteration_key: form.iteration_key.clone(),
            },
        )
        .await
    }

    async fn update(&self, id: &str, form: &Iteration) -> Result<Iteration, ApiError> {
        iterations::update(
            &self.client,
            id,
            &UpdateIterationRequest {
                iteration_key: form.iteration_key.clone(),
            },
        )
        .await
    }
}

#[derive(Debug, Serialize)]
struct IterationRow {
    key: String,
    repos: u32,
    windows: u32,
    attached: String,
}

impl From<&Iteration> for IterationRow {
    fn from(iteration: &Iteration) -> Self {
        Self {
            key: iteration.iteration_key.clone(),
            repos: iteration.repo_count,
            windows: iteration.mounted_windows,
            attached: value_or_dash(iteration.attach_at.as_deref()),
        }
    }
}

impl TableOutput for IterationRow {
    fn print_table(&self, _color: bool) {
        println!(
            "{:<28} {:>6} {:>8}  {}",
            self.key, self.repos, self.windows, self.attached
        );
    }
}

impl IterationCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            IterationSubcommand::List(args) => self.list(args, global).await,
            IterationSubcommand::View(args) => self.view(args, global).await,
            IterationSubcommand::Create(args) => self.create(args, global).await,
            IterationSubcommand::Delete(args) => self.delete(args, global).await,
            IterationSubcommand::AddRepos(args) => self.add_repos(args, global).await,
            IterationSubcommand::RemoveRepos(args) => self.remove_repos(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let fetcher = Arc::new(IterationFetcher {
            client: ctx.client.clone(),
        });

        let mut page = ListPage::new(ListPageOptions::new(
            fetcher,
            IterationFilter {
                keyword: args.keyword.clone(),
            },
        ));
        page.query.page = args.page;
        page.query.page_size = args.page_size;

        let spinner = progress_spinner(global, "Loading iterations...");
        page.mount().await;
        spinner.finish_and_clear();
        ctx.check_session()?;

        let writer = output_writer(global);
        let rows: Vec<IterationRow> = page.list.iter().map(IterationRow::from).collect();
        if !global.json && !rows.is_empty() {
            println!("{:<28} {:>6} {:>8}  {}", "KEY", "REPOS", "WINDOWS", "ATTACHED");
        }
        writer.write_list(&rows)?;
        if !global.json {
            writer.write_info(&format!(
                "page {}: {} of {} iteration(s)",
                page.query.page,
                page.list.len(),
                page.total
            ));
        }
        Ok(())
    }

    async fn view(&self, args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let iteration = ctx.surface(iterations::get(&ctx.client, &args.key).await)?;

        let writer = output_writer(global);
        if global.json {
            crate::output::write_json(&iteration)?;
        } else {
            crate::output::print_field("key", &iteration.iteration_key, writer.color());
            crate::output::print_field("repos", &iteration.repo_count.to_string(), writer.color());
            crate::output::print_field(
                "windows",
                &iteration.mounted_windows.to_string(),
                writer.color(),
            );
            crate::output::print_field(
                "attached",
                &value_or_dash(iteration.attach_at.as_deref()),
                writer.color(),
            );
        }
        Ok(())
    }

    /// Create an iteration through the dialog-form flow.
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("iteration:write")?;

        let key = match &args.key {
            Some(key) => key.clone(),
            None if global.no_prompt => anyhow::bail!("an iteration key is required with --no-prompt"),
            None => prompt_input("Iteration key")?,
        };

        let backend = Arc::new(IterationBackend {
            client: ctx.client.clone(),
        });
        let mut dialog = DialogForm::new(backend, Iteration::default());
        dialog
            .open(OpenOptions::create().preset(move |form: &mut Iteration| {
                form.iteration_key = key;
            }))
            .await;

        let created = ctx
            .surface_any(dialog.submit().await)?
            .ok_or_else(|| anyhow::anyhow!("create flow returned no entity"))?;

        output_writer(global).write_success(&format!("iteration {} created", created.iteration_key));
        Ok(())
    }

    async fn delete(&self, args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("iteration:write")?;

        if !global.no_prompt
            && !prompt_confirm(&format!("Delete iteration {}?", args.key), false)?
        {
            output_writer(global).write_info("aborted");
            return Ok(());
        }

        ctx.surface(iterations::delete(&ctx.client, &args.key).await)?;
        output_writer(global).write_success(&format!("iteration {} deleted", args.key));
        Ok(())
    }

    async fn add_repos(&self, args: &ReposArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("iteration:write")?;

        let updated =
            ctx.surface(iterations::add_repos(&ctx.client, &args.key, &args.repos).await)?;
        output_writer(global).write_success(&format!(
            "{} repo(s) attached to {} ({} total)",
            args.repos.len(),
            updated.iteration_key,
            updated.repo_count
        ));
        Ok(())
    }

    async fn remove_repos(&self, args: &ReposArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("iteration:write")?;

        let updated =
            ctx.surface(iterations::remove_repos(&ctx.client, &args.key, &args.repos).await)?;
        output_writer(global).write_success(&format!(
            "{} repo(s) detached from {} ({} remaining)",
            args.repos.len(),
            updated.iteration_key,
            updated.repo_count
        ));
        Ok(())
    }
}
