//
//  releasehub-cli
//  api/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repositories resource client.
//!
//! Repositories are read-mostly here: the console lists them, inspects one,
//! and triggers a metadata re-sync against the hosting platform.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{PageQuery, PageResult, PaginationMode};
use super::http::{ApiClient, ApiError};

const BASE: &str = "/v1/repositories";

/// How this entity's list endpoint paginates.
pub const PAGINATION: PaginationMode = PaginationMode::Server;

/// A repository as returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Full repository slug, e.g. `org/service-api`.
    pub repo: String,
    /// Owning project id.
    #[serde(default)]
    pub project_id: i64,
    /// Default branch name.
    #[serde(default)]
    pub default_branch: String,
    /// Whether the release service may push to the repository.
    #[serde(default)]
    pub writable: bool,
}

/// Filter fields of the repositories list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryFilter {
    /// Substring match on the repository slug.
    pub keyword: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListParams<'a> {
    page: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
}

/// Lists repositories matching the query.
pub async fn list(
    client: &ApiClient,
    query: &PageQuery<RepositoryFilter>,
) -> Result<PageResult<Repository>, ApiError> {
    let params = ListParams {
        page: query.page,
        size: query.page_size,
        keyword: query.filter.keyword.as_deref(),
    };
    client.get_query(BASE, &params).await
}

/// Fetches a single repository by id.
pub async fn get(client: &ApiClient, id: &str) -> Result<Repository, ApiError> {
    client.get(&format!("{BASE}/{id}")).await
}

/// Triggers a metadata re-sync for the repository.
pub async fn sync(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.post(&format!("{BASE}/{id}/sync"), &json!({})).await
}
