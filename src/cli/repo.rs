//
//  releasehub-cli
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::common::{PageQuery, PageResult};
use crate::api::http::{ApiClient, ApiError};
use crate::api::repositories::{self, Repository, RepositoryFilter};
use crate::crud::{ListPage, ListPageOptions, PageFetcher};
use crate::output::{format_bool, TableOutput};

use super::{output_writer, progress_spinner, CommandContext, GlobalOptions};

const ROUTE: &str = "/repositories";

/// Manage repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// List repositories
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View one repository
    View(IdArgs),

    /// Trigger a metadata re-sync
    Sync(IdArgs),
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
pub struct IdArgs {
    /// Repository id
    pub id: String,
}

struct RepoFetcher {
    client: Arc<ApiClient>,
}

#[async_trait]
impl PageFetcher<Repository, RepositoryFilter> for RepoFetcher {
    async fn fetch_page(
        &self,
        query: &PageQuery<RepositoryFilter>,
    ) -> Result<PageResult<Repository>, ApiError> {
        repositories::list(&self.client, query).await
    }
}

#[derive(Debug, Serialize)]
struct RepoRow {
    repo: String,
    project: i64,
    default_branch: String,
    writable: bool,
}

impl From<&Repository> for RepoRow {
    fn from(repository: &Repository) -> Self {
        Self {
            repo: repository.repo.clone(),
            project: repository.project_id,
            default_branch: repository.default_branch.clone(),
            writable: repository.writable,
        }
    }
}

impl TableOutput for RepoRow {
    fn print_table(&self, _color: bool) {
        println!(
            "{:<36} {:>8} {:<16} {}",
            self.repo,
            self.project,
            self.default_branch,
            format_bool(self.writable)
        );
    }
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RepoSubcommand::List(args) => self.list(args, global).await,
            RepoSubcommand::View(args) => self.view(args, global).await,
            RepoSubcommand::Sync(args) => self.sync(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let fetcher = Arc::new(RepoFetcher {
            client: ctx.client.clone(),
        });

        let mut page = ListPage::new(ListPageOptions::new(
            fetcher,
            RepositoryFilter {
                keyword: args.keyword.clone(),
            },
        ));
        page.query.page = args.page;
        page.query.page_size = args.page_size;

        let spinner = progress_spinner(global, "Loading repositories...");
        page.mount().await;
        spinner.finish_and_clear();
        ctx.check_session()?;

        let writer = output_writer(global);
        let rows: Vec<RepoRow> = page.list.iter().map(RepoRow::from).collect();
        if !global.json && !rows.is_empty() {
            println!(
                "{:<36} {:>8} {:<16} {}",
                "REPO", "PROJECT", "BRANCH", "WRITABLE"
            );
        }
        writer.write_list(&rows)?;
        if !global.json {
            writer.write_info(&format!(
                "page {}: {} of {} repositories",
                page.query.page,
                page.list.len(),
                page.total
            ));
        }
        Ok(())
    }

    async fn view(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let repository = ctx.surface(repositories::get(&ctx.client, &args.id).await)?;

        let writer = output_writer(global);
        if global.json {
            crate::output::write_json(&repository)?;
        } else {
            crate::output::print_field("repo", &repository.repo, writer.color());
            crate::output::print_field(
                "project",
                &repository.project_id.to_string(),
                writer.color(),
            );
            crate::output::print_field("branch", &repository.default_branch, writer.color());
            crate::output::print_field(
                "writable",
                format_bool(repository.writable),
                writer.color(),
            );
        }
        Ok(())
    }

    async fn sync(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("repository:write")?;

        ctx.surface(repositories::sync(&ctx.client, &args.id).await)?;
        output_writer(global).write_success(&format!("sync triggered for repository {}", args.id));
        Ok(())
    }
}
