//
//  releasehub-cli
//  cli/run.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Run-history commands.
//!
//! Paged history, per-run detail/tasks/logs, and the single-shot retry
//! actions for failed runs and tasks.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::common::{PageQuery, PageResult};
use crate::api::http::{ApiClient, ApiError};
use crate::api::runs::{self, RunFilter, RunStatus, RunSummary};
use crate::crud::{ListPage, ListPageOptions, PageFetcher};
use crate::output::{TableBuilder, TableOutput};
use crate::util::{format_timestamp, value_or_dash};

use super::{output_writer, progress_spinner, CommandContext, GlobalOptions};

const ROUTE: &str = "/runs";

/// Inspect run history
#[derive(Args, Debug)]
pub struct RunCommand {
    #[command(subcommand)]
    pub command: RunSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RunSubcommand {
    /// List runs
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View one run
    View(IdArgs),

    /// Retry a failed run
    Retry(IdArgs),

    /// List the tasks of a run
    Tasks(IdArgs),

    /// Retry a single failed task
    RetryTask(RetryTaskArgs),

    /// Show the captured logs of a run
    Logs(IdArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by release window key
    #[arg(long)]
    pub window: Option<String>,

    /// Filter by repository slug
    #[arg(long)]
    pub repo: Option<String>,

    /// Filter by iteration key
    #[arg(long)]
    pub iteration: Option<String>,

    /// Filter by status (RUNNING, SUCCEEDED, FAILED, CANCELLED, MERGE_BLOCKED)
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
    /// Run id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct RetryTaskArgs {
    /// Run id
    pub id: String,

    /// Task id
    pub task_id: String,
}

struct RunFetcher {
    client: Arc<ApiClient>,
}

#[async_trait]
impl PageFetcher<RunSummary, RunFilter> for RunFetcher {
    async fn fetch_page(
        &self,
        query: &PageQuery<RunFilter>,
    ) -> Result<PageResult<RunSummary>, ApiError> {
        runs::list(&self.client, query).await
    }
}

#[derive(Debug, Serialize)]
struct RunRow {
    id: String,
    run_type: String,
    status: String,
    started: String,
    ended: String,
}

impl From<&RunSummary> for RunRow {
    fn from(run: &RunSummary) -> Self {
        Self {
            id: run.id.clone(),
            run_type: run.run_type.clone(),
            status: run.status.to_string(),
            started: run
                .started_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
            ended: run
                .ended_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl TableOutput for RunRow {
    fn print_table(&self, color: bool) {
        let status = if color {
            match self.status.as_str() {
                "SUCCEEDED" => style(self.status.clone()).green().to_string(),
                "FAILED" => style(self.status.clone()).red().to_string(),
                "RUNNING" => style(self.status.clone()).cyan().to_string(),
                "MERGE_BLOCKED" => style(self.status.clone()).yellow().to_string(),
                _ => self.status.clone(),
            }
        } else {
            self.status.clone()
        };
        println!(
            "{:<12} {:<24} {:<14} {:<17} {}",
            self.id, self.run_type, status, self.started, self.ended
        );
    }
}

impl RunCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RunSubcommand::List(args) => self.list(args, global).await,
            RunSubcommand::View(args) => self.view(args, global).await,
            RunSubcommand::Retry(args) => self.retry(args, global).await,
            RunSubcommand::Tasks(args) => self.tasks(args, global).await,
            RunSubcommand::RetryTask(args) => self.retry_task(args, global).await,
            RunSubcommand::Logs(args) => self.logs(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let status = match args.status.as_deref() {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };

        let fetcher = Arc::new(RunFetcher {
            client: ctx.client.clone(),
        });
        let mut page = ListPage::new(ListPageOptions::new(
            fetcher,
            RunFilter {
                window_key: args.window.clone(),
                repo: args.repo.clone(),
                iteration_key: args.iteration.clone(),
                status,
            },
        ));
        page.query.page = args.page;
        page.query.page_size = args.page_size;

        let spinner = progress_spinner(global, "Loading run history...");
        page.mount().await;
        spinner.finish_and_clear();
        ctx.check_session()?;

        let writer = output_writer(global);
        let rows: Vec<RunRow> = page.list.iter().map(RunRow::from).collect();
        if !global.json && !rows.is_empty() {
            println!(
                "{:<12} {:<24} {:<14} {:<17} {}",
                "ID", "TYPE", "STATUS", "STARTED", "ENDED"
            );
        }
        writer.write_list(&rows)?;
        if !global.json {
            writer.write_info(&format!(
                "page {}: {} of {} run(s)",
                page.query.page,
                page.list.len(),
                page.total
            ));
        }
        Ok(())
    }

    async fn view(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let detail = ctx.surface(runs::get(&ctx.client, &args.id).await)?;

        let writer = output_writer(global);
        if global.json {
            crate::output::write_json(&detail)?;
            return Ok(());
        }
        let run = &detail.summary;
        crate::output::print_field("id", &run.id, writer.color());
        crate::output::print_field("type", &run.run_type, writer.color());
        crate::output::print_field("status", &run.status.to_string(), writer.color());
        crate::output::print_field(
            "window",
            &value_or_dash(run.window_key.as_deref()),
            writer.color(),
        );
        crate::output::print_field("repo", &value_or_dash(run.repo.as_deref()), writer.color());
        crate::output::print_field(
            "started",
            &value_or_dash(run.started_at.as_deref()),
            writer.color(),
        );
        crate::output::print_field(
            "ended",
            &value_or_dash(run.ended_at.as_deref()),
            writer.color(),
        );
        if let Some(error) = &detail.error {
            writer.write_error(&error.message);
        }
        Ok(())
    }

    async fn retry(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("run:write")?;

        ctx.surface(runs::retry(&ctx.client, &args.id).await)?;
        output_writer(global).write_success(&format!("run {} queued for retry", args.id));
        Ok(())
    }

    async fn tasks(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let tasks = ctx.surface(runs::tasks(&ctx.client, &args.id).await)?;

        if global.json {
            crate::output::write_json(&tasks)?;
            return Ok(());
        }

        let mut table = TableBuilder::new().headers(["TASK", "NAME", "STATUS", "STARTED", "ENDED"]);
        for task in &tasks {
            table = table.row([
                task.task_id.clone(),
                task.name.clone(),
                task.status.to_string(),
                task.started_at
                    .as_deref()
                    .map(format_timestamp)
                    .unwrap_or_else(|| "-".to_string()),
                task.ended_at
                    .as_deref()
                    .map(format_timestamp)
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        table.print();
        Ok(())
    }

    async fn retry_task(&self, args: &RetryTaskArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("run:write")?;

        ctx.surface(runs::retry_task(&ctx.client, &args.id, &args.task_id).await)?;
        output_writer(global).write_success(&format!(
            "task {} of run {} queued for retry",
            args.task_id, args.id
        ));
        Ok(())
    }

    async fn logs(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let logs = ctx.surface(runs::logs(&ctx.client, &args.id).await)?;

        if global.json {
            crate::output::write_json(&logs)?;
            return Ok(());
        }
        for line in &logs.lines {
            println!("{line}");
        }
        Ok(())
    }
}

fn parse_status(raw: &str) -> Result<RunStatus> {
    let status = match raw.to_uppercase().as_str() {
        "RUNNING" => RunStatus::Running,
        "SUCCEEDED" => RunStatus::Succeeded,
        "FAILED" => RunStatus::Failed,
        "CANCELLED" => RunStatus::Cancelled,
        "MERGE_BLOCKED" => RunStatus::MergeBlocked,
        other => anyhow::bail!(
            "unknown status '{other}' (expected RUNNING, SUCCEEDED, FAILED, CANCELLED, or MERGE_BLOCKED)"
        ),
    };
    Ok(status)
}
