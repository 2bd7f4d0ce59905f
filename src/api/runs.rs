//
//  releasehub-cli
//  api/runs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Run-history resource client.
//!
//! Runs record orchestration and scan executions. The history screen pages
//! through `GET /v1/runs/paged`; a failed run (or one of its tasks) can be
//! retried with a single-shot call. The client itself never retries
//! anything, so these endpoints are the only retry surface.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::common::{PageQuery, PageResult, PaginationMode, ServerPage};
use super::http::{ApiClient, ApiError};

const BASE: &str = "/v1/runs";

/// How this entity's list endpoint paginates.
pub const PAGINATION: PaginationMode = PaginationMode::Server;

/// Execution state of a run or run task.
///
/// Unknown states deserialize to [`Unknown`](Self::Unknown) so vocabulary
/// drift on the backend cannot break the history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Still executing.
    Running,
    /// Finished successfully.
    Succeeded,
    /// Finished with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
    /// Blocked waiting on a merge gate.
    MergeBlocked,
    /// A state this build does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::MergeBlocked => "MERGE_BLOCKED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// One row of the run history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Stable run id.
    pub id: String,
    /// Run kind, e.g. `WINDOW_ORCHESTRATION` or `SCAN`.
    #[serde(rename = "type")]
    pub run_type: String,
    /// Current execution state.
    pub status: RunStatus,
    /// Start timestamp, RFC 3339.
    #[serde(default)]
    pub started_at: Option<String>,
    /// End timestamp, absent while running.
    #[serde(default)]
    pub ended_at: Option<String>,
    /// Release window the run belongs to.
    #[serde(default)]
    pub window_key: Option<String>,
    /// Repository the run operated on.
    #[serde(default)]
    pub repo: Option<String>,
    /// Iteration the run operated on.
    #[serde(default)]
    pub iteration_key: Option<String>,
}

/// Error detail attached to a failed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    /// Failure message.
    pub message: String,
    /// Server-side stack trace, when available.
    #[serde(default)]
    pub stack: Option<String>,
}

/// Full run record: summary plus request/result/error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDetail {
    /// Summary fields.
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Run result payload, shape depends on the run kind.
    #[serde(default)]
    pub result: Option<Value>,
    /// Failure detail for failed runs.
    #[serde(default)]
    pub error: Option<RunError>,
}

/// One task inside a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTask {
    /// Stable task id.
    pub task_id: String,
    /// Task name, e.g. `freeze-branches`.
    pub name: String,
    /// Current execution state.
    pub status: RunStatus,
    /// Start timestamp.
    #[serde(default)]
    pub started_at: Option<String>,
    /// End timestamp.
    #[serde(default)]
    pub ended_at: Option<String>,
}

/// Log lines captured for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLogs {
    /// The run the lines belong to.
    pub run_id: String,
    /// Captured log lines, oldest first.
    pub lines: Vec<String>,
}

/// Filter fields of the run-history screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFilter {
    /// Restrict to one release window.
    pub window_key: Option<String>,
    /// Restrict to one repository.
    pub repo: Option<String>,
    /// Restrict to one iteration.
    pub iteration_key: Option<String>,
    /// Restrict to one execution state.
    pub status: Option<RunStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListParams<'a> {
    page: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    window_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iteration_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<RunStatus>,
}

/// Pages through the run history.
pub async fn list(
    client: &ApiClient,
    query: &PageQuery<RunFilter>,
) -> Result<PageResult<RunSummary>, ApiError> {
    let params = ListParams {
        page: query.page,
        size: query.page_size,
        window_key: query.filter.window_key.as_deref(),
        repo: query.filter.repo.as_deref(),
        iteration_key: query.filter.iteration_key.as_deref(),
        status: query.filter.status,
    };
    let page: ServerPage<RunSummary> = client.get_query(&format!("{BASE}/paged"), &params).await?;
    Ok(page.into_page_result())
}

/// Fetches the full record of one run.
pub async fn get(client: &ApiClient, id: &str) -> Result<RunDetail, ApiError> {
    client.get(&format!("{BASE}/{id}")).await
}

/// Retries a failed run. Single-shot; the caller owns any further policy.
pub async fn retry(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.post(&format!("{BASE}/{id}/retry"), &json!({})).await
}

/// Lists the tasks of a run.
pub async fn tasks(client: &ApiClient, id: &str) -> Result<Vec<RunTask>, ApiError> {
    client.get(&format!("{BASE}/{id}/tasks")).await
}

/// Retries a single failed task of a run.
pub async fn retry_task(client: &ApiClient, id: &str, task_id: &str) -> Result<(), ApiError> {
    client
        .post(&format!("{BASE}/{id}/tasks/{task_id}/retry"), &json!({}))
        .await
}

/// Fetches the captured log lines of a run.
pub async fn logs(client: &ApiClient, id: &str) -> Result<RunLogs, ApiError> {
    client.get(&format!("{BASE}/{id}/logs")).await
}
