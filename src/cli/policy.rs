//
//  releasehub-cli
//  cli/policy.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Version-policy commands.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::common::{PageQuery, PageResult};
use crate::api::http::{ApiClient, ApiError};
use crate::api::version_policies::{
    self, CreateVersionPolicyReq, UpdateVersionPolicyReq, VersionPolicy, VersionPolicyFilter,
};
use crate::crud::{CrudBackend, CrudMode, DetailForm, ListPage, ListPageOptions, PageFetcher};
use crate::interactive::{prompt_confirm, prompt_input_with_default};
use crate::output::TableOutput;
use crate::util::value_or_dash;

use super::{output_writer, progress_spinner, CommandContext, GlobalOptions};

const ROUTE: &str = "/version-policies";

/// Manage version policies
#[derive(Args, Debug)]
pub struct PolicyCommand {
    #[command(subcommand)]
    pub command: PolicySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PolicySubcommand {
    /// List version policies
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View one policy
    View(IdArgs),

    /// Create a policy
    Create(CreateArgs),

    /// Update a policy
    Update(UpdateArgs),

    /// Delete a policy
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by policy name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page
    #[arg(long = "page-size", default_value = "10")]
    pub page_size: u32,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Policy id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Policy name
    pub name: String,

    /// Strategy, e.g. Major.Minor.Patch
    #[arg(long, short = 's')]
    pub strategy: String,

    /// Free-text description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Policy id
    pub id: String,

    /// New name (prompted from the current value when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// New strategy (prompted from the current value when omitted)
    #[arg(long, short = 's')]
    pub strategy: Option<String>,
}

struct PolicyFetcher {
    client: Arc<ApiClient>,
}

#[async_trait]
impl PageFetcher<VersionPolicy, VersionPolicyFilter> for PolicyFetcher {
    async fn fetch_page(
        &self,
        query: &PageQuery<VersionPolicyFilter>,
    ) -> Result<PageResult<VersionPolicy>, ApiError> {
        version_policies::list(&self.client, query).await
    }
}

struct PolicyBackend {
    client: Arc<ApiClient>,
}

#[async_trait]
impl CrudBackend<VersionPolicy> for PolicyBackend {
    async fn fetch_by_id(&self, id: &str) -> Result<VersionPolicy, ApiError> {
        version_policies::get(&self.client, id).await
    }

    async fn create(&self, form: &VersionPolicy) -> Result<VersionPolicy, ApiError> {
        version_policies::create(
            &self.client,
            &CreateVersionPolicyReq {
                name: form.name.clone(),
                strategy: form.strategy.clone(),
                description: form.description.clone(),
            },
        )
        .await
    }

    async fn update(&self, id: &str, form: &VersionPolicy) -> Result<VersionPolicy, ApiError> {
        version_policies::update(
            &self.client,
            id,
            &UpdateVersionPolicyReq {
                name: form.name.clone(),
                strategy: form.strategy.clone(),
                description: form.description.clone(),
            },
        )
        .await
    }
}

#[derive(Debug, Serialize)]
struct PolicyRow {
    id: String,
    name: String,
    strategy: String,
}

impl From<&VersionPolicy> for PolicyRow {
    fn from(policy: &VersionPolicy) -> Self {
        Self {
            id: policy.id.clone(),
            name: policy.name.clone(),
            strategy: policy.strategy.clone(),
        }
    }
}

impl TableOutput for PolicyRow {
    fn print_table(&self, _color: bool) {
        println!("{:<8} {:<28} {}", self.id, self.name, self.strategy);
    }
}

impl PolicyCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PolicySubcommand::List(args) => self.list(args, global).await,
            PolicySubcommand::View(args) => self.view(args, global).await,
            PolicySubcommand::Create(args) => self.create(args, global).await,
            PolicySubcommand::Update(args) => self.update(args, global).await,
            PolicySubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let fetcher = Arc::new(PolicyFetcher {
            client: ctx.client.clone(),
        });

        let mut page = ListPage::new(ListPageOptions::new(
            fetcher,
            VersionPolicyFilter {
                name: args.name.clone(),
            },
        ));
        page.query.page = args.page;
        page.query.page_size = args.page_size;

        let spinner = progress_spinner(global, "Loading version policies...");
        page.mount().await;
        spinner.finish_and_clear();
        ctx.check_session()?;

        let writer = output_writer(global);
        let rows: Vec<PolicyRow> = page.list.iter().map(PolicyRow::from).collect();
        if !global.json && !rows.is_empty() {
            println!("{:<8} {:<28} {}", "ID", "NAME", "STRATEGY");
        }
        writer.write_list(&rows)?;
        if !global.json {
            writer.write_info(&format!(
                "page {}: {} of {} policies",
                page.query.page,
                page.list.len(),
                page.total
            ));
        }
        Ok(())
    }

    async fn view(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let backend = Arc::new(PolicyBackend {
            client: ctx.client.clone(),
        });
        let mut detail = DetailForm::new(backend, VersionPolicy::default());

        if !detail.load(args.id.clone(), CrudMode::View).await {
            ctx.check_session()?;
            anyhow::bail!("version policy {} could not be loaded", args.id);
        }

        let writer = output_writer(global);
        if global.json {
            crate::output::write_json(&detail.form)?;
        } else {
            crate::output::print_field("id", &detail.form.id, writer.color());
            crate::output::print_field("name", &detail.form.name, writer.color());
            crate::output::print_field("strategy", &detail.form.strategy, writer.color());
            crate::output::print_field(
                "description",
                &value_or_dash(detail.form.description.as_deref()),
                writer.color(),
            );
        }
        Ok(())
    }

    /// Create a policy through the full-page form flow.
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("version-policy:write")?;

        let backend = Arc::new(PolicyBackend {
            client: ctx.client.clone(),
        });
        let mut form = DetailForm::new(backend, VersionPolicy::default());
        form.form.name = args.name.clone();
        form.form.strategy = args.strategy.clone();
        form.form.description = args.description.clone();

        ctx.surface_any(form.submit().await)?;
        output_writer(global).write_success(&format!("version policy {} created", args.name));
        Ok(())
    }

    /// Update a policy through the edit form flow, prompting from the
    /// loaded values when fields are omitted.
    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("version-policy:write")?;

        let backend = Arc::new(PolicyBackend {
            client: ctx.client.clone(),
        });
        let mut form = DetailForm::new(backend, VersionPolicy::default());
        if !form.load(args.id.clone(), CrudMode::Edit).await {
            ctx.check_session()?;
            anyhow::bail!("version policy {} could not be loaded", args.id);
        }

        form.form.name = match &args.name {
            Some(name) => name.clone(),
            None if global.no_prompt => form.form.name.clone(),
            None => prompt_input_with_default("Name", &form.form.name)?,
        };
        form.form.strategy = match &args.strategy {
            Some(strategy) => strategy.clone(),
            None if global.no_prompt => form.form.strategy.clone(),
            None => prompt_input_with_default("Strategy", &form.form.strategy)?,
        };

        ctx.surface_any(form.submit().await)?;
        output_writer(global).write_success(&format!("version policy {} updated", args.id));
        Ok(())
    }

    async fn delete(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("version-policy:write")?;

        if !global.no_prompt
            && !prompt_confirm(&format!("Delete version policy {}?", args.id), false)?
        {
            output_writer(global).write_info("aborted");
            return Ok(());
        }

        ctx.surface(version_policies::delete(&ctx.client, &args.id).await)?;
        output_writer(global).write_success(&format!("version policy {} deleted", args.id));
        Ok(())
    }
}
