//
//  releasehub-cli
//  cli/rule.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch-rule commands.
//!
//! List/create/update plus enable/disable toggles and pattern testing.
//! `rule test --local` evaluates the pattern in-process for instant
//! feedback; without the flag the rule is dry-run on the server.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::branch_rules::{
    self, matches_locally, BranchRule, BranchRuleFilter, BranchRuleTestInput, BranchRuleTestReq,
    BranchRuleType, CreateBranchRuleReq, RuleStatus, UpdateBranchRuleReq,
};
use crate::api::common::{PageQuery, PageResult};
use crate::api::http::{ApiClient, ApiError};
use crate::crud::{CrudBackend, DialogForm, ListPage, ListPageOptions, OpenOptions, PageFetcher};
use crate::output::TableOutput;
use crate::util::truncate;

use super::{output_writer, progress_spinner, CommandContext, GlobalOptions};

const ROUTE: &str = "/branch-rules";

/// Manage branch rules
#[derive(Args, Debug)]
pub struct RuleCommand {
    #[command(subcommand)]
    pub command: RuleSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RuleSubcommand {
    /// List branch rules
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a branch rule
    Create(CreateArgs),

    /// Update a branch rule's pattern
    Update(UpdateArgs),

    /// Enable a rule
    Enable(IdArgs),

    /// Disable a rule
    Disable(IdArgs),

    /// Test a pattern against a branch name
    Test(TestArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by rule name
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
    /// Rule id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Rule name
    pub name: String,

    /// Pattern, e.g. 'release/{version}' or 'hotfix/.+'
    #[arg(long, short = 'p')]
    pub pattern: String,

    /// Interpret the pattern as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Free-text description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Rule id
    pub id: String,

    /// New pattern
    #[arg(long, short = 'p')]
    pub pattern: String,
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Branch name to evaluate
    pub branch: String,

    /// Test an existing rule by id
    #[arg(long, conflicts_with = "pattern")]
    pub rule: Option<String>,

    /// Test an ad-hoc pattern
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Interpret the ad-hoc pattern as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Evaluate locally instead of on the server
    #[arg(long)]
    pub local: bool,
}

struct RuleFetcher {
    client: Arc<ApiClient>,
}

#[async_trait]
impl PageFetcher<BranchRule, BranchRuleFilter> for RuleFetcher {
    async fn fetch_page(
        &self,
        query: &PageQuery<BranchRuleFilter>,
    ) -> Result<PageResult<BranchRule>, ApiError> {
        branch_rules::list(&self.client, query).await
    }
}

/// Form backend adapting the rule request shapes.
struct RuleBackend {
    client: Arc<ApiClient>,
}

#[async_trait]
impl CrudBackend<BranchRule> for RuleBackend {
    async fn fetch_by_id(&self, id: &str) -> Result<BranchRule, ApiError> {
        branch_rules::get(&self.client, id).await
    }

    async fn create(&self, form: &BranchRule) -> Result<BranchRule, ApiError> {
        branch_rules::create(
            &self.client,
            &CreateBranchRuleReq {
                name: form.name.clone(),
                rule_type: form.rule_type,
                pattern: form.pattern.clone(),
                description: form.description.clone(),
                scope: form.scope.clone(),
            },
        )
        .await
    }

    async fn update(&self, id: &str, form: &BranchRule) -> Result<BranchRule, ApiError> {
        branch_rules::update(
            &self.client,
            id,
            &UpdateBranchRuleReq {
                name: Some(form.name.clone()),
                rule_type: Some(form.rule_type),
                pattern: Some(form.pattern.clone()),
                description: form.description.clone(),
                scope: Some(form.scope.clone()),
                status: Some(form.status),
            },
        )
        .await
    }
}

#[derive(Debug, Serialize)]
struct RuleRow {
    id: String,
    name: String,
    rule_type: String,
    pattern: String,
    status: String,
}

impl From<&BranchRule> for RuleRow {
    fn from(rule: &BranchRule) -> Self {
        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            rule_type: match rule.rule_type {
                BranchRuleType::Template => "TEMPLATE".to_string(),
                BranchRuleType::Regex => "REGEX".to_string(),
            },
            pattern: truncate(&rule.pattern, 32),
            status: match rule.status {
                RuleStatus::Enabled => "ENABLED".to_string(),
                RuleStatus::Disabled => "DISABLED".to_string(),
            },
        }
    }
}

impl TableOutput for RuleRow {
    fn print_table(&self, _color: bool) {
        println!(
            "{:<8} {:<24} {:<10} {:<34} {}",
            self.id, self.name, self.rule_type, self.pattern, self.status
        );
    }
}

impl RuleCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RuleSubcommand::List(args) => self.list(args, global).await,
            RuleSubcommand::Create(args) => self.create(args, global).await,
            RuleSubcommand::Update(args) => self.update(args, global).await,
            RuleSubcommand::Enable(args) => self.toggle(args, global, true).await,
            RuleSubcommand::Disable(args) => self.toggle(args, global, false).await,
            RuleSubcommand::Test(args) => self.test(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let fetcher = Arc::new(RuleFetcher {
            client: ctx.client.clone(),
        });

        let mut page = ListPage::new(ListPageOptions::new(
            fetcher,
            BranchRuleFilter {
                name: args.name.clone(),
            },
        ));
        page.query.page = args.page;
        page.query.page_size = args.page_size;

        let spinner = progress_spinner(global, "Loading branch rules...");
        page.mount().await;
        spinner.finish_and_clear();
        ctx.check_session()?;

        let writer = output_writer(global);
        let rows: Vec<RuleRow> = page.list.iter().map(RuleRow::from).collect();
        if !global.json && !rows.is_empty() {
            println!(
                "{:<8} {:<24} {:<10} {:<34} {}",
                "ID", "NAME", "TYPE", "PATTERN", "STATUS"
            );
        }
        writer.write_list(&rows)?;
        if !global.json {
            writer.write_info(&format!(
                "page {}: {} of {} rule(s)",
                page.query.page,
                page.list.len(),
                page.total
            ));
        }
        Ok(())
    }

    /// Create a rule through the dialog-form flow.
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("branch-rule:write")?;

        let rule_type = if args.regex {
            BranchRuleType::Regex
        } else {
            BranchRuleType::Template
        };
        // Validate the pattern locally before it leaves the machine.
        matches_locally(rule_type, &args.pattern, "validation-probe")?;

        let backend = Arc::new(RuleBackend {
            client: ctx.client.clone(),
        });
        let mut dialog = DialogForm::new(backend, BranchRule::default());

        let name = args.name.clone();
        let pattern = args.pattern.clone();
        let description = args.description.clone();
        dialog
            .open(OpenOptions::create().preset(move |form: &mut BranchRule| {
                form.name = name;
                form.rule_type = rule_type;
                form.pattern = pattern;
                form.description = description;
            }))
            .await;

        let created = ctx
            .surface_any(dialog.submit().await)?
            .ok_or_else(|| anyhow::anyhow!("create flow returned no entity"))?;
        output_writer(global).write_success(&format!("branch rule {} created", created.name));
        Ok(())
    }

    /// Update a rule's pattern through the edit dialog flow.
    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("branch-rule:write")?;

        let backend = Arc::new(RuleBackend {
            client: ctx.client.clone(),
        });
        let mut dialog = DialogForm::new(backend, BranchRule::default());

        let pattern = args.pattern.clone();
        dialog
            .open(
                OpenOptions::edit(args.id.clone()).preset(move |form: &mut BranchRule| {
                    form.pattern = pattern;
                }),
            )
            .await;

        let updated = ctx
            .surface_any(dialog.submit().await)?
            .ok_or_else(|| anyhow::anyhow!("update flow returned no entity"))?;
        output_writer(global).write_success(&format!(
            "branch rule {} updated to pattern {}",
            updated.name, updated.pattern
        ));
        Ok(())
    }

    async fn toggle(&self, args: &IdArgs, global: &GlobalOptions, enable: bool) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        ctx.require_perm("branch-rule:write")?;

        if enable {
            ctx.surface(branch_rules::enable(&ctx.client, &args.id).await)?;
        } else {
            ctx.surface(branch_rules::disable(&ctx.client, &args.id).await)?;
        }
        output_writer(global).write_success(&format!(
            "branch rule {} {}",
            args.id,
            if enable { "enabled" } else { "disabled" }
        ));
        Ok(())
    }

    async fn test(&self, args: &TestArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, ROUTE).await?;
        let writer = output_writer(global);

        if args.local {
            let pattern = args
                .pattern
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--pattern is required with --local"))?;
            let rule_type = if args.regex {
                BranchRuleType::Regex
            } else {
                BranchRuleType::Template
            };
            let ok = matches_locally(rule_type, pattern, &args.branch)?;
            if ok {
                writer.write_success(&format!("{} matches {}", args.branch, pattern));
            } else {
                writer.write_warning(&format!("{} does not match {}", args.branch, pattern));
            }
            return Ok(());
        }

        let payload = BranchRuleTestReq {
            rule_id: args.rule.clone(),
            rule_type: args.pattern.as_ref().map(|_| {
                if args.regex {
                    BranchRuleType::Regex
                } else {
                    BranchRuleType::Template
                }
            }),
            pattern: args.pattern.clone(),
            input: BranchRuleTestInput {
                branch_name: Some(args.branch.clone()),
            },
        };
        let reply = ctx.surface(branch_rules::test(&ctx.client, &payload).await)?;

        if reply.ok {
            writer.write_success(&format!("{} passes", args.branch));
        } else {
            writer.write_warning(&format!("{} is rejected", args.branch));
        }
        if let Some(errors) = &reply.errors {
            for error in errors {
                writer.write_error(error);
            }
        }
        Ok(())
    }
}
