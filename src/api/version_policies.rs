//
//  releasehub-cli
//  api/version_policies.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Version-policies resource client.
//!
//! A version policy names the strategy used to compute the next version of
//! a module (semantic, date-based, custom). The list endpoint is one of the
//! legacy full-list endpoints, so this client filters and slices in memory.

use serde::{Deserialize, Serialize};

use super::common::{paginate, PageQuery, PageResult, PaginationMode};
use super::http::{ApiClient, ApiError};

const BASE: &str = "/v1/version-policies";

/// How this entity's list endpoint paginates.
pub const PAGINATION: PaginationMode = PaginationMode::Client;

/// A version policy as returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPolicy {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Strategy description, e.g. `Major.Minor.Patch`.
    pub strategy: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Filter fields of the version-policies list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionPolicyFilter {
    /// Substring match on the policy name.
    pub name: Option<String>,
}

/// Request body for creating a policy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionPolicyReq {
    /// Display name.
    pub name: String,
    /// Strategy description.
    pub strategy: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for updating a policy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVersionPolicyReq {
    /// New display name.
    pub name: String,
    /// New strategy description.
    pub strategy: String,
    /// New free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Lists version policies matching the query.
///
/// The backend returns the full list; filtering and slicing happen here,
/// with `total` reflecting the filtered pre-slice count.
pub async fn list(
    client: &ApiClient,
    query: &PageQuery<VersionPolicyFilter>,
) -> Result<PageResult<VersionPolicy>, ApiError> {
    let mut items: Vec<VersionPolicy> = client.get(BASE).await?;

    if let Some(name) = &query.filter.name {
        let needle = name.to_lowercase();
        items.retain(|policy| policy.name.to_lowercase().contains(&needle));
    }

    Ok(paginate(items, query.page, query.page_size))
}

/// Fetches a single policy by id.
pub async fn get(client: &ApiClient, id: &str) -> Result<VersionPolicy, ApiError> {
    client.get(&format!("{BASE}/{id}")).await
}

/// Creates a new policy.
pub async fn create(
    client: &ApiClient,
    payload: &CreateVersionPolicyReq,
) -> Result<VersionPolicy, ApiError> {
    client.post(BASE, payload).await
}

/// Updates a policy.
pub async fn update(
    client: &ApiClient,
    id: &str,
    payload: &UpdateVersionPolicyReq,
) -> Result<VersionPolicy, ApiError> {
    client.put(&format!("{BASE}/{id}"), payload).await
}

/// Deletes a policy.
pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("{BASE}/{id}")).await
}
