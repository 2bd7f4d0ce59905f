//
//  releasehub-cli
//  api/release_windows.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Release-windows resource client.
//!
//! A release window is the unit of release planning: it is created as a
//! draft, configured with a start/end range, frozen and unfrozen while the
//! cut is prepared, published, and finally closed. Iterations are mounted
//! onto a window with [`attach`]/[`detach`].
//!
//! The list endpoint predates server pagination and returns the full list;
//! this client filters and slices in memory, keeping the pre-slice total.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{paginate, PageQuery, PageResult, PaginationMode};
use super::http::{ApiClient, ApiError};

const BASE: &str = "/v1/release-windows";

/// How this entity's list endpoint paginates.
pub const PAGINATION: PaginationMode = PaginationMode::Client;

/// Lifecycle states of a release window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseWindowStatus {
    /// Created but not yet configured.
    Draft,
    /// Configured, waiting to open.
    Init,
    /// Accepting merges.
    Open,
    /// Temporarily frozen for a cut.
    Frozen,
    /// Closed without publishing.
    Closed,
    /// Published to production.
    Published,
}

impl std::fmt::Display for ReleaseWindowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Draft => "DRAFT",
            Self::Init => "INIT",
            Self::Open => "OPEN",
            Self::Frozen => "FROZEN",
            Self::Closed => "CLOSED",
            Self::Published => "PUBLISHED",
        };
        f.write_str(label)
    }
}

/// A release window as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseWindowView {
    /// Stable id.
    pub id: String,
    /// Human-assigned window key, e.g. `2026-03-regular`.
    pub window_key: String,
    /// Display name.
    pub name: String,
    /// Current lifecycle state.
    pub status: ReleaseWindowStatus,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
    /// Configured window start.
    #[serde(default)]
    pub start_at: Option<String>,
    /// Configured window end.
    #[serde(default)]
    pub end_at: Option<String>,
    /// Whether merges are currently frozen.
    #[serde(default)]
    pub frozen: bool,
    /// When the window was published, if it has been.
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Default for ReleaseWindowView {
    fn default() -> Self {
        Self {
            id: String::new(),
            window_key: String::new(),
            name: String::new(),
            status: ReleaseWindowStatus::Draft,
            created_at: String::new(),
            updated_at: String::new(),
            start_at: None,
            end_at: None,
            frozen: false,
            published_at: None,
        }
    }
}

/// Filter fields of the release-windows list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseWindowFilter {
    /// Substring match on the window name.
    pub name: Option<String>,
    /// Exact status match.
    pub status: Option<ReleaseWindowStatus>,
}

/// Request body for creating a release window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReleaseWindowReq {
    /// Key of the new window.
    pub window_key: String,
    /// Display name.
    pub name: String,
}

/// Request body for configuring the window's time range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureReleaseWindowReq {
    /// Window start, RFC 3339.
    pub start_at: String,
    /// Window end, RFC 3339.
    pub end_at: String,
}

/// Lists release windows matching the query.
///
/// The backend returns the full list; name/status filtering and slicing
/// happen here, with `total` reflecting the filtered pre-slice count.
pub async fn list(
    client: &ApiClient,
    query: &PageQuery<ReleaseWindowFilter>,
) -> Result<PageResult<ReleaseWindowView>, ApiError> {
    let mut items: Vec<ReleaseWindowView> = client.get(BASE).await?;

    if let Some(name) = &query.filter.name {
        let needle = name.to_lowercase();
        items.retain(|window| window.name.to_lowercase().contains(&needle));
    }
    if let Some(status) = query.filter.status {
        items.retain(|window| window.status == status);
    }

    Ok(paginate(items, query.page, query.page_size))
}

/// Fetches a single release window by id.
pub async fn get(client: &ApiClient, id: &str) -> Result<ReleaseWindowView, ApiError> {
    client.get(&format!("{BASE}/{id}")).await
}

/// Creates a new release window in the `DRAFT` state.
pub async fn create(
    client: &ApiClient,
    payload: &CreateReleaseWindowReq,
) -> Result<ReleaseWindowView, ApiError> {
    client.post(BASE, payload).await
}

/// Configures the window's start/end range.
pub async fn configure(
    client: &ApiClient,
    id: &str,
    payload: &ConfigureReleaseWindowReq,
) -> Result<ReleaseWindowView, ApiError> {
    client.put(&format!("{BASE}/{id}/window"), payload).await
}

/// Freezes the window.
pub async fn freeze(client: &ApiClient, id: &str) -> Result<ReleaseWindowView, ApiError> {
    lifecycle(client, id, "freeze").await
}

/// Unfreezes the window.
pub async fn unfreeze(client: &ApiClient, id: &str) -> Result<ReleaseWindowView, ApiError> {
    lifecycle(client, id, "unfreeze").await
}

/// Publishes the window.
pub async fn publish(client: &ApiClient, id: &str) -> Result<ReleaseWindowView, ApiError> {
    lifecycle(client, id, "publish").await
}

/// Closes the window.
pub async fn close(client: &ApiClient, id: &str) -> Result<ReleaseWindowView, ApiError> {
    lifecycle(client, id, "close").await
}

/// Mounts an iteration onto the window.
pub async fn attach(
    client: &ApiClient,
    id: &str,
    iteration_key: &str,
) -> Result<ReleaseWindowView, ApiError> {
    client
        .post(
            &format!("{BASE}/{id}/attach"),
            &json!({ "iterationKey": iteration_key }),
        )
        .await
}

/// Unmounts the window's iteration.
pub async fn detach(client: &ApiClient, id: &str) -> Result<ReleaseWindowView, ApiError> {
    lifecycle(client, id, "detach").await
}

async fn lifecycle(
    client: &ApiClient,
    id: &str,
    action: &str,
) -> Result<ReleaseWindowView, ApiError> {
    client.post(&format!("{BASE}/{id}/{action}"), &json!({})).await
}
