//
//  releasehub-cli
//  api/branch_rules.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch-rules resource client.
//!
//! Branch rules constrain which branch names participate in a release. A
//! rule is either a `TEMPLATE` (placeholder pattern such as
//! `release/{version}`) or a `REGEX`, scoped globally or to a project /
//! sub-project. Rules can be dry-run against a branch name either on the
//! server ([`test`]) or locally ([`matches_locally`]) for quick previews.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{PageQuery, PageResult, PaginationMode, ServerPage};
use super::http::{ApiClient, ApiError};

const BASE: &str = "/v1/branch-rules";

/// How this entity's list endpoint paginates.
pub const PAGINATION: PaginationMode = PaginationMode::Server;

/// How a rule's pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchRuleType {
    /// Placeholder template, e.g. `release/{version}`.
    Template,
    /// Full regular expression.
    Regex,
}

/// Enablement state of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    /// Rule is evaluated.
    Enabled,
    /// Rule is kept but ignored.
    Disabled,
}

/// Where a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeLevel {
    /// Applies everywhere.
    Global,
    /// Applies to one project.
    Project,
    /// Applies to one sub-project.
    SubProject,
}

/// Scope of a branch rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRuleScope {
    /// Scope level.
    pub level: ScopeLevel,
    /// Project id, for project-level scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Sub-project id, for sub-project-level scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_project_id: Option<String>,
}

impl BranchRuleScope {
    /// A global scope.
    pub fn global() -> Self {
        Self {
            level: ScopeLevel::Global,
            project_id: None,
            sub_project_id: None,
        }
    }
}

/// A branch rule as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRule {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Pattern interpretation.
    #[serde(rename = "type")]
    pub rule_type: BranchRuleType,
    /// Template or regex pattern.
    pub pattern: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Where the rule applies.
    pub scope: BranchRuleScope,
    /// Enablement state.
    pub status: RuleStatus,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
}

impl Default for BranchRule {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            rule_type: BranchRuleType::Template,
            pattern: String::new(),
            description: None,
            scope: BranchRuleScope::global(),
            status: RuleStatus::Enabled,
            updated_at: String::new(),
        }
    }
}

/// Filter fields of the branch-rules list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchRuleFilter {
    /// Substring match on the rule name.
    pub name: Option<String>,
}

/// Request body for creating a rule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRuleReq {
    /// Display name.
    pub name: String,
    /// Pattern interpretation.
    #[serde(rename = "type")]
    pub rule_type: BranchRuleType,
    /// Template or regex pattern.
    pub pattern: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the rule applies.
    pub scope: BranchRuleScope,
}

/// Request body for updating a rule; only set fields change.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchRuleReq {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New pattern interpretation.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<BranchRuleType>,
    /// New pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<BranchRuleScope>,
    /// New enablement state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RuleStatus>,
}

/// Request body for a server-side rule dry-run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRuleTestReq {
    /// Test an existing rule by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Or test an ad-hoc pattern: its interpretation…
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<BranchRuleType>,
    /// …and the pattern itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Input the rule is evaluated against.
    pub input: BranchRuleTestInput,
}

/// Input block of a rule dry-run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRuleTestInput {
    /// Branch name to evaluate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

/// Reply of a rule dry-run.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRuleTestResp {
    /// Whether the input satisfied the rule.
    pub ok: bool,
    /// Rendered pattern, for template rules.
    #[serde(default)]
    pub rendered: Option<String>,
    /// Evaluation errors, if any.
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListParams<'a> {
    page: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Pages through branch rules.
pub async fn list(
    client: &ApiClient,
    query: &PageQuery<BranchRuleFilter>,
) -> Result<PageResult<BranchRule>, ApiError> {
    let params = ListParams {
        page: query.page,
        size: query.page_size,
        name: query.filter.name.as_deref(),
    };
    let page: ServerPage<BranchRule> = client.get_query(&format!("{BASE}/paged"), &params).await?;
    Ok(page.into_page_result())
}

/// Fetches a single rule by id.
pub async fn get(client: &ApiClient, id: &str) -> Result<BranchRule, ApiError> {
    client.get(&format!("{BASE}/{id}")).await
}

/// Creates a new rule.
pub async fn create(
    client: &ApiClient,
    payload: &CreateBranchRuleReq,
) -> Result<BranchRule, ApiError> {
    client.post(BASE, payload).await
}

/// Updates a rule.
pub async fn update(
    client: &ApiClient,
    id: &str,
    payload: &UpdateBranchRuleReq,
) -> Result<BranchRule, ApiError> {
    client.put(&format!("{BASE}/{id}"), payload).await
}

/// Enables a rule.
pub async fn enable(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.post(&format!("{BASE}/{id}/enable"), &json!({})).await
}

/// Disables a rule.
pub async fn disable(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.post(&format!("{BASE}/{id}/disable"), &json!({})).await
}

/// Dry-runs a rule (or an ad-hoc pattern) on the server.
pub async fn test(
    client: &ApiClient,
    payload: &BranchRuleTestReq,
) -> Result<BranchRuleTestResp, ApiError> {
    client.post(&format!("{BASE}/test"), payload).await
}

/// Evaluates a pattern against a branch name locally.
///
/// Used for instant previews in the console before a rule is saved. Template
/// patterns treat `{placeholder}` segments as one path segment; regex
/// patterns are anchored to the full branch name.
pub fn matches_locally(
    rule_type: BranchRuleType,
    pattern: &str,
    branch: &str,
) -> anyhow::Result<bool> {
    let expr = match rule_type {
        BranchRuleType::Regex => format!("^(?:{pattern})$"),
        BranchRuleType::Template => template_to_regex(pattern),
    };
    let re = regex::Regex::new(&expr)?;
    Ok(re.is_match(branch))
}

/// Translates a `{placeholder}` template into an anchored regex.
fn template_to_regex(template: &str) -> String {
    let mut expr = String::from("^");
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (literal, tail) = rest.split_at(open);
        expr.push_str(&regex::escape(literal));
        match tail.find('}') {
            Some(close) => {
                // Placeholders match exactly one path segment.
                expr.push_str("[^/]+");
                rest = &tail[close + 1..];
            }
            None => {
                // Unbalanced brace: treat the remainder literally.
                expr.push_str(&regex::escape(tail));
                rest = "";
            }
        }
    }
    expr.push_str(&regex::escape(rest));
    expr.push('$');
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_rules_match_one_segment_per_placeholder() {
        assert!(matches_locally(
            BranchRuleType::Template,
            "release/{version}",
            "release/1.42.0"
        )
        .unwrap());
        assert!(!matches_locally(
            BranchRuleType::Template,
            "release/{version}",
            "release/1.42.0/hotfix"
        )
        .unwrap());
        assert!(!matches_locally(BranchRuleType::Template, "release/{version}", "feature/x").unwrap());
    }

    #[test]
    fn template_literals_are_escaped() {
        assert!(matches_locally(BranchRuleType::Template, "v1.0/{n}", "v1.0/rc1").unwrap());
        assert!(!matches_locally(BranchRuleType::Template, "v1.0/{n}", "v1x0/rc1").unwrap());
    }

    #[test]
    fn regex_rules_are_anchored() {
        assert!(matches_locally(BranchRuleType::Regex, "hotfix/.+", "hotfix/login").unwrap());
        assert!(!matches_locally(BranchRuleType::Regex, "hotfix/.+", "prefix/hotfix/login").unwrap());
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(matches_locally(BranchRuleType::Regex, "relea(se", "release").is_err());
    }

    #[test]
    fn rule_type_uses_wire_names() {
        let rule = BranchRule {
            rule_type: BranchRuleType::Regex,
            ..BranchRule::default()
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "REGEX");
        assert_eq!(json["scope"]["level"], "GLOBAL");
    }
}
