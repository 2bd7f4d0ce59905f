//
//  releasehub-cli
//  api/iterations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Iterations resource client.
//!
//! Iterations group repositories for a development cycle and get mounted
//! onto release windows. The list endpoint is server-paginated, but it has
//! shipped two reply shapes over time (a paged object and a legacy bare
//! array); [`list`] tolerates both and always returns a normalized
//! [`PageResult`].

use serde::{Deserialize, Serialize};

use super::common::{PageQuery, PageResult, PaginationMode};
use super::http::{ApiClient, ApiError};

const BASE: &str = "/v1/iterations";

/// How this entity's list endpoint paginates.
pub const PAGINATION: PaginationMode = PaginationMode::Server;

/// An iteration as returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    /// Unique iteration key, e.g. `2026-Q1-sprint-3`.
    pub iteration_key: String,
    /// Number of repositories attached to the iteration.
    #[serde(default)]
    pub repo_count: u32,
    /// Number of release windows the iteration is mounted on.
    #[serde(default)]
    pub mounted_windows: u32,
    /// When the iteration was attached, RFC 3339.
    #[serde(default)]
    pub attach_at: Option<String>,
}

/// Filter fields of the iterations list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterationFilter {
    /// Substring match on the iteration key.
    pub keyword: Option<String>,
}

/// Request body for creating an iteration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIterationRequest {
    /// Key of the new iteration.
    pub iteration_key: String,
}

/// Request body for renaming an iteration key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIterationRequest {
    /// New key for the iteration.
    pub iteration_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListParams<'a> {
    page: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
}

#[derive(Serialize)]
struct RepoSelection<'a> {
    repos: &'a [String],
}

// The endpoint has shipped both a paged object and a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListReply {
    Paged(PageResult<Iteration>),
    Legacy(Vec<Iteration>),
}

/// Lists iterations matching the query.
///
/// Legacy bare-array replies are normalized with their length as the total.
pub async fn list(
    client: &ApiClient,
    query: &PageQuery<IterationFilter>,
) -> Result<PageResult<Iteration>, ApiError> {
    let params = ListParams {
        page: query.page,
        size: query.page_size,
        keyword: query.filter.keyword.as_deref(),
    };
    let reply: ListReply = client.get_query(BASE, &params).await?;
    Ok(match reply {
        ListReply::Paged(page) => page,
        ListReply::Legacy(items) => {
            let total = items.len() as u64;
            PageResult { list: items, total }
        }
    })
}

/// Fetches a single iteration by key.
pub async fn get(client: &ApiClient, key: &str) -> Result<Iteration, ApiError> {
    client.get(&format!("{BASE}/{key}")).await
}

/// Creates a new iteration.
pub async fn create(
    client: &ApiClient,
    payload: &CreateIterationRequest,
) -> Result<Iteration, ApiError> {
    client.post(BASE, payload).await
}

/// Updates an iteration.
pub async fn update(
    client: &ApiClient,
    key: &str,
    payload: &UpdateIterationRequest,
) -> Result<Iteration, ApiError> {
    client.put(&format!("{BASE}/{key}"), payload).await
}

/// Deletes an iteration.
pub async fn delete(client: &ApiClient, key: &str) -> Result<(), ApiError> {
    client.delete(&format!("{BASE}/{key}")).await
}

/// Attaches repositories to an iteration.
pub async fn add_repos(
    client: &ApiClient,
    key: &str,
    repos: &[String],
) -> Result<Iteration, ApiError> {
    client
        .post(&format!("{BASE}/{key}/repos/add"), &RepoSelection { repos })
        .await
}

/// Detaches repositories from an iteration.
pub async fn remove_repos(
    client: &ApiClient,
    key: &str,
    repos: &[String],
) -> Result<Iteration, ApiError> {
    client
        .post(&format!("{BASE}/{key}/repos/remove"), &RepoSelection { repos })
        .await
}
