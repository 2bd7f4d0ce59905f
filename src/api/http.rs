//
//  releasehub-cli
//  api/http.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the ReleaseHub API
//!
//! This module is the single choke point for all backend communication.
//! Every request and response passes through [`ApiClient`], which handles:
//!
//! - Bearer-token injection on every call except the login call
//! - Unwrapping the `{code, message, data, traceId}` response envelope
//! - Collapsing every failure mode into one [`ApiError`]
//! - Session teardown and login navigation on session expiry (HTTP 401)
//!
//! ## Error Taxonomy
//!
//! | Failure | Detection | Resulting error |
//! |---------|-----------|-----------------|
//! | Business error | Envelope with non-success code (any HTTP status) | Envelope `code`/`message`/`traceId` |
//! | Login rejected | HTTP 401 on the login call | Fixed [`codes::AUTH_FAILED`] |
//! | Session expiry | HTTP 401 on any other call | Envelope or network error, after teardown |
//! | Network error | Transport failure or non-envelope error body | [`codes::NETWORK_ERROR`] |
//!
//! All four converge to [`ApiError`]; nothing above this layer constructs a
//! different error type.
//!
//! ## Dependency Seams
//!
//! The client reads the bearer token through the [`SessionState`] trait and
//! performs forced navigation through the [`Navigator`] trait. Both are
//! injected at construction, which keeps the session store the single source
//! of truth without an import cycle between the store and the client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed error codes produced by the client itself.
///
/// Backend business errors carry their own codes; these three cover the
/// failure modes the client has to synthesize locally.
pub mod codes {
    /// The login call itself was rejected (HTTP 401 on `/auth/login`).
    pub const AUTH_FAILED: &str = "AUTH_FAILED";

    /// Transport-level failure, or an error body that is not an envelope.
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

    /// An enveloped error body without a usable code of its own.
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
}

/// Path of the login endpoint. Requests to it never carry a bearer token,
/// and a 401 from it is an authentication failure rather than session expiry.
pub const LOGIN_PATH: &str = "/v1/auth/login";

/// Route of the login screen, used to avoid redundant redirects.
pub const LOGIN_ROUTE: &str = "/login";

/// Fixed request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// The application error every failure path converges to.
///
/// Produced exactly once per failed call, at the client boundary. Resource
/// clients and the CRUD state machines propagate it unchanged.
///
/// # Fields
///
/// - `code`: Business code from the envelope, or one of [`codes`]
/// - `message`: Human-readable message for the notifier
/// - `trace_id`: Backend trace id, when the envelope carried one
/// - `http_status`: Transport status, when a response was received
/// - `details`: Diagnostic payload (the envelope's `data` on failures)
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Failure code; business codes come from the envelope.
    pub code: String,
    /// Human-readable failure message.
    pub message: String,
    /// Backend trace id for support lookups.
    pub trace_id: Option<String>,
    /// HTTP status of the failing response, if one was received.
    pub http_status: Option<u16>,
    /// Diagnostic detail carried by the failure (envelope `data` or raw body).
    pub details: Option<Value>,
}

impl ApiError {
    /// Builds a network-class error with the fixed [`codes::NETWORK_ERROR`] code.
    pub(crate) fn network(
        message: impl Into<String>,
        http_status: Option<u16>,
        details: Option<Value>,
    ) -> Self {
        Self {
            code: codes::NETWORK_ERROR.to_string(),
            message: message.into(),
            trace_id: None,
            http_status,
            details,
        }
    }

    /// Whether this error is the fixed login-rejection error.
    pub fn is_auth_failure(&self) -> bool {
        self.code == codes::AUTH_FAILED
    }
}

/// The wire-level response envelope used by every backend endpoint.
///
/// A `code` of `"0"` (or `"OK"`) marks success; any other code is a
/// business-level failure even when the HTTP status is 2xx. `data` carries
/// the payload on success and diagnostic detail on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Business result code; `"0"` or `"OK"` on success.
    pub code: String,
    /// Human-readable result message.
    pub message: String,
    /// Payload on success, diagnostic detail on failure.
    pub data: T,
    /// Backend trace id for correlating with server logs.
    #[serde(rename = "traceId", default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Whether the envelope's code marks success.
    pub fn is_success(&self) -> bool {
        is_success_code(&self.code)
    }
}

/// Whether a wire code marks success. Both `"0"` and `"OK"` are accepted.
pub fn is_success_code(code: &str) -> bool {
    code == "0" || code == "OK"
}

/// Structural predicate for enveloped bodies.
///
/// The backend does not tag envelopes, so they are detected by shape: an
/// object with a string `code`, a string `message`, and a `data` key. This
/// is a documented boundary assumption, not a general parsing mechanism;
/// bodies that fail the check are treated as raw payloads.
pub fn is_api_response(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("code").map(Value::is_string).unwrap_or(false)
        && obj.get("message").map(Value::is_string).unwrap_or(false)
        && obj.contains_key("data")
}

/// Session state read and written by the client.
///
/// The client reads the bearer token synchronously during request
/// construction and tears the session down on session expiry. The session
/// store implements this trait; injecting it as a trait object avoids an
/// import cycle between the store and the client.
pub trait SessionState: Send + Sync {
    /// Current bearer token, if any.
    fn token(&self) -> Option<String>;

    /// Tears the session down after a session-expiry failure.
    fn clear(&self);
}

/// Navigation seam used for forced logout.
///
/// On session expiry the client navigates to the login route, preserving the
/// prior route as a redirect target so the user returns there after
/// re-authenticating.
pub trait Navigator: Send + Sync {
    /// Full path of the route currently shown.
    fn current_route(&self) -> String;

    /// Replaces the current route with the login route, carrying `redirect`.
    fn replace_to_login(&self, redirect: &str);
}

/// The HTTP client for the ReleaseHub API.
///
/// All resource clients call through this type. It owns a configured
/// `reqwest` client with a fixed timeout and user agent, plus the injected
/// session and navigator seams.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use releasehub_cli::api::http::ApiClient;
/// use releasehub_cli::router::RouteState;
/// use releasehub_cli::session::SessionStore;
///
/// let session = Arc::new(SessionStore::in_memory());
/// let route = Arc::new(RouteState::new("/iterations"));
/// let client = ApiClient::new("http://localhost:8080", session, route)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Notes
///
/// - The client never retries; retry policy is a caller concern.
/// - The login call never carries a bearer token, so a stale token cannot
///   cause the login attempt itself to be rejected.
pub struct ApiClient {
    /// The underlying HTTP client.
    http: Client,
    /// Base URL of the backend, without a trailing slash.
    base_url: String,
    /// Session seam for token reads and forced teardown.
    session: Arc<dyn SessionState>,
    /// Navigation seam for forced logout redirects.
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Creates a new client against the given base URL.
    ///
    /// # Parameters
    ///
    /// * `base_url` - Backend origin, e.g. `http://localhost:8080`
    /// * `session` - Session provider read for bearer tokens
    /// * `navigator` - Navigation sink for session-expiry redirects
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionState>,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("rh/{}", crate::VERSION))
                .timeout(REQUEST_TIMEOUT)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes a GET request to the specified path.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>, None::<&()>).await
    }

    /// Makes a GET request with query parameters.
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(Method::GET, path, Some(query), None::<&()>).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, None::<&()>, Some(body)).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, None::<&()>, Some(body)).await
    }

    /// Makes a DELETE request to the specified path.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, None::<&()>, None::<&()>).await
    }

    /// Issues a request and returns the unwrapped, typed payload.
    ///
    /// On success the envelope's `data` is deserialized into `T`; bodies that
    /// are not enveloped deserialize as-is. Every failure mode (transport
    /// error, non-2xx status, or an envelope with a failure code on a 2xx)
    /// surfaces as an [`ApiError`].
    ///
    /// # Parameters
    ///
    /// * `method` - HTTP method
    /// * `path` - API path appended to the base URL (e.g. `/v1/iterations`)
    /// * `query` - Optional query parameters
    /// * `body` - Optional JSON body
    pub async fn request<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        // The login call must never carry a (possibly stale) token.
        let is_login = path.starts_with(LOGIN_PATH);
        if !is_login {
            if let Some(token) = self.session.token() {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|err| {
            tracing::debug!("transport failure for {path}: {err}");
            ApiError::network(err.to_string(), None, None)
        })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| ApiError::network(err.to_string(), Some(status.as_u16()), None))?;

        if !status.is_success() {
            return Err(self.classify_failure(status, &body_text, is_login));
        }

        unwrap_body(status, &body_text)
    }

    /// Classifies a non-2xx response into an [`ApiError`].
    ///
    /// 401 handling runs first: on the login call it produces the fixed
    /// authentication-failure error without touching the session; on any
    /// other call it clears the session and, unless the login route is
    /// already current, navigates there with the prior path as the redirect
    /// target. Afterwards the error itself is built from the envelope when
    /// the body is enveloped, else as a network error.
    fn classify_failure(&self, status: StatusCode, body: &str, is_login: bool) -> ApiError {
        let parsed = serde_json::from_str::<Value>(body).ok();

        if status == StatusCode::UNAUTHORIZED {
            if is_login {
                return ApiError {
                    code: codes::AUTH_FAILED.to_string(),
                    message: "Incorrect username or password".to_string(),
                    trace_id: None,
                    http_status: Some(status.as_u16()),
                    details: parsed,
                };
            }

            // Session expiry: tear down before surfacing the error, and
            // bounce to login unless it is already the current route.
            self.session.clear();
            let current = self.navigator.current_route();
            if !current.starts_with(LOGIN_ROUTE) {
                self.navigator.replace_to_login(&current);
            }
        }

        match parsed {
            Some(ref value) => match as_envelope(value) {
                Some(envelope) => error_from_envelope(envelope, Some(status.as_u16())),
                None => ApiError::network(
                    format!("request failed with status {status}"),
                    Some(status.as_u16()),
                    parsed.clone(),
                ),
            },
            None => ApiError::network(
                format!("request failed with status {status}"),
                Some(status.as_u16()),
                None,
            ),
        }
    }
}

/// Parses a body value into the envelope type when it has the envelope shape.
fn as_envelope(value: &Value) -> Option<ApiResponse<Value>> {
    if !is_api_response(value) {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// Builds an [`ApiError`] from an enveloped failure body.
fn error_from_envelope(envelope: ApiResponse<Value>, http_status: Option<u16>) -> ApiError {
    let code = if envelope.code.is_empty() {
        codes::HTTP_ERROR.to_string()
    } else {
        envelope.code
    };
    let message = if envelope.message.is_empty() {
        "Request failed".to_string()
    } else {
        envelope.message
    };

    ApiError {
        code,
        message,
        trace_id: envelope.trace_id,
        http_status,
        details: Some(envelope.data),
    }
}

/// Unwraps a 2xx body: envelopes yield their `data` (or an error when the
/// code marks failure), raw bodies deserialize as-is. Empty bodies
/// deserialize as `null`, which covers `()` replies.
fn unwrap_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(|err| {
            ApiError::network(
                format!("invalid response body: {err}"),
                Some(status.as_u16()),
                None,
            )
        })?
    };

    let payload = match as_envelope(&value) {
        Some(envelope) => {
            if !envelope.is_success() {
                return Err(error_from_envelope(envelope, Some(status.as_u16())));
            }
            envelope.data
        }
        None => value,
    };

    serde_json::from_value(payload).map_err(|err| {
        ApiError::network(
            format!("invalid response payload: {err}"),
            Some(status.as_u16()),
            None,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_envelopes_by_shape() {
        assert!(is_api_response(&json!({
            "code": "0",
            "message": "ok",
            "data": {"id": "1"}
        })));
        assert!(is_api_response(&json!({
            "code": "4001",
            "message": "repo not found",
            "data": null
        })));
    }

    #[test]
    fn rejects_non_envelopes() {
        assert!(!is_api_response(&json!([1, 2, 3])));
        assert!(!is_api_response(&json!({"code": 0, "message": "ok", "data": null})));
        assert!(!is_api_response(&json!({"code": "0", "message": "ok"})));
        assert!(!is_api_response(&json!("0")));
    }

    #[test]
    fn success_codes() {
        assert!(is_success_code("0"));
        assert!(is_success_code("OK"));
        assert!(!is_success_code("4001"));
        assert!(!is_success_code(""));
    }

    #[test]
    fn unwraps_enveloped_data() {
        let body = r#"{"code":"0","message":"ok","data":{"name":"win-1"}}"#;
        let value: Value = unwrap_body(StatusCode::OK, body).unwrap();
        assert_eq!(value, json!({"name": "win-1"}));
    }

    #[test]
    fn business_failure_on_2xx_becomes_error() {
        let body = r#"{"code":"4001","message":"repo not found","data":null,"traceId":"t-9"}"#;
        let err = unwrap_body::<Value>(StatusCode::OK, body).unwrap_err();
        assert_eq!(err.code, "4001");
        assert_eq!(err.message, "repo not found");
        assert_eq!(err.trace_id.as_deref(), Some("t-9"));
        assert_eq!(err.http_status, Some(200));
    }

    #[test]
    fn raw_bodies_pass_through() {
        let body = r#"[{"id":"a"},{"id":"b"}]"#;
        let value: Value = unwrap_body(StatusCode::OK, body).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn empty_body_unwraps_to_unit() {
        unwrap_body::<()>(StatusCode::OK, "").unwrap();
    }

    #[test]
    fn envelope_error_falls_back_to_fixed_code() {
        let envelope = as_envelope(&json!({"code": "", "message": "", "data": null})).unwrap();
        let err = error_from_envelope(envelope, Some(500));
        assert_eq!(err.code, codes::HTTP_ERROR);
        assert_eq!(err.message, "Request failed");
    }
}
