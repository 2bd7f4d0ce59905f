//
//  releasehub-cli
//  api/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication resource client.
//!
//! Two endpoints: `POST /v1/auth/login` exchanges credentials for a bearer
//! token, and `GET /v1/me` returns the authenticated user's profile and
//! permission grants. The login call is the one request the HTTP client
//! never attaches a token to.

use serde::{Deserialize, Serialize};

use super::http::{ApiClient, ApiError, LOGIN_PATH};

/// Credentials for the login call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Ask the backend for an extended token lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

/// Successful login reply.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// The authenticated user's profile, as kept in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable user id.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Name shown in the console.
    pub display_name: String,
}

/// Reply of `GET /v1/me`: profile fields plus permission grants.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMeResult {
    /// Stable user id.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Name shown in the console.
    pub display_name: String,
    /// Permission grants, e.g. `release-window:write`.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Exchanges credentials for a bearer token.
pub async fn login(client: &ApiClient, payload: &LoginPayload) -> Result<LoginResult, ApiError> {
    client.post(LOGIN_PATH, payload).await
}

/// Fetches the authenticated user's profile and permissions.
pub async fn me(client: &ApiClient) -> Result<UserMeResult, ApiError> {
    client.get("/v1/me").await
}
