//
//  releasehub-cli
//  tests/http_client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end tests of the HTTP client's envelope and failure semantics
//! against a mock backend.

use std::sync::Arc;

use mockito::Matcher;
use serde_json::{json, Value};

use releasehub_cli::api::auth::LoginPayload;
use releasehub_cli::api::http::{codes, ApiClient};
use releasehub_cli::router::RouteState;
use releasehub_cli::session::{MemoryTokenStore, PermMode, SessionStore};

fn harness(
    base_url: &str,
    token: Option<&str>,
    route: &str,
) -> (Arc<SessionStore>, Arc<RouteState>, ApiClient) {
    let storage = match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    };
    let session = Arc::new(SessionStore::load(Box::new(storage), PermMode::Soft));
    let state = Arc::new(RouteState::new(route));
    let client = ApiClient::new(base_url, session.clone(), state.clone()).unwrap();
    (session, state, client)
}

#[tokio::test]
async fn unwraps_enveloped_success_payloads() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "code": "0",
                "message": "ok",
                "data": {"id": "u-1", "username": "rel", "displayName": "Rel Eng", "permissions": []}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (_, _, client) = harness(&server.url(), Some("tok"), "/iterations");
    let me: Value = client.get("/v1/me").await.unwrap();
    assert_eq!(me["username"], "rel");
    mock.assert_async().await;
}

#[tokio::test]
async fn business_failure_on_http_200_surfaces_the_envelope_code() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/repositories/r-1")
        .with_status(200)
        .with_body(
            json!({"code": "4001", "message": "repo not found", "data": null, "traceId": "t-17"})
                .to_string(),
        )
        .create_async()
        .await;

    let (session, _, client) = harness(&server.url(), Some("tok"), "/repositories");
    let err = client.get::<Value>("/v1/repositories/r-1").await.unwrap_err();

    assert_eq!(err.code, "4001");
    assert_eq!(err.message, "repo not found");
    assert_eq!(err.trace_id.as_deref(), Some("t-17"));
    assert_eq!(err.http_status, Some(200));
    // A business failure is not a session event.
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn bearer_header_is_attached_when_a_token_is_present() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/iterations/it-1")
        .match_header("authorization", "Bearer tok-abc")
        .with_status(200)
        .with_body(json!({"code": "0", "message": "ok", "data": {"iterationKey": "it-1"}}).to_string())
        .create_async()
        .await;

    let (_, _, client) = harness(&server.url(), Some("tok-abc"), "/iterations");
    let _: Value = client.get("/v1/iterations/it-1").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn login_call_never_carries_the_bearer_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/auth/login")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(json!({"code": "0", "message": "ok", "data": {"token": "fresh"}}).to_string())
        .create_async()
        .await;

    // A stale token is present, but must not reach the login endpoint.
    let (session, _, client) = harness(&server.url(), Some("stale"), "/login");
    let payload = LoginPayload {
        username: "rel".to_string(),
        password: "hunter2".to_string(),
        remember_me: None,
    };
    session.login(&client, &payload).await.unwrap();

    assert_eq!(session.token().as_deref(), Some("fresh"));
    mock.assert_async().await;
}

#[tokio::test]
async fn login_401_is_the_fixed_auth_failure_without_teardown_or_navigation() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/auth/login")
        .with_status(401)
        .with_body(json!({"error": "bad credentials"}).to_string())
        .create_async()
        .await;

    let (session, route, client) = harness(&server.url(), Some("still-here"), "/login");
    let payload = LoginPayload {
        username: "rel".to_string(),
        password: "wrong".to_string(),
        remember_me: None,
    };
    let err = session.login(&client, &payload).await.unwrap_err();

    assert_eq!(err.code, codes::AUTH_FAILED);
    assert_eq!(err.message, "Incorrect username or password");
    assert!(err.is_auth_failure());
    // Login failures are local to the login screen: no teardown, no redirect.
    assert_eq!(session.token().as_deref(), Some("still-here"));
    assert_eq!(route.current(), "/login");
}

#[tokio::test]
async fn session_expiry_clears_the_session_and_redirects_with_the_prior_path() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/runs/paged")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(json!({"code": "401", "message": "token expired", "data": null}).to_string())
        .create_async()
        .await;

    let (session, route, client) = harness(&server.url(), Some("expired"), "/runs?status=FAILED");
    let err = client.get::<Value>("/v1/runs/paged").await.unwrap_err();

    assert_eq!(err.code, "401");
    assert!(session.token().is_none(), "session must be cleared");
    assert!(route.on_login());
    assert_eq!(route.redirect_target().as_deref(), Some("/runs?status=FAILED"));
}

#[tokio::test]
async fn session_expiry_on_the_login_route_does_not_navigate_again() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/me")
        .with_status(401)
        .with_body("{}")
        .create_async()
        .await;

    let (session, route, client) = harness(&server.url(), Some("expired"), "/login?redirect=%2Fruns");
    let _ = client.get::<Value>("/v1/me").await.unwrap_err();

    assert!(session.token().is_none());
    // Already on login: the route (and its redirect) stays untouched.
    assert_eq!(route.current(), "/login?redirect=%2Fruns");
}

#[tokio::test]
async fn non_envelope_error_bodies_become_network_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/version-policies")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let (_, _, client) = harness(&server.url(), Some("tok"), "/version-policies");
    let err = client.get::<Value>("/v1/version-policies").await.unwrap_err();

    assert_eq!(err.code, codes::NETWORK_ERROR);
    assert_eq!(err.http_status, Some(503));
}

#[tokio::test]
async fn enveloped_error_bodies_keep_their_code_on_transport_failures() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/release-windows/w-1/freeze")
        .with_status(409)
        .with_body(
            json!({"code": "5002", "message": "window already frozen", "data": null}).to_string(),
        )
        .create_async()
        .await;

    let (_, _, client) = harness(&server.url(), Some("tok"), "/release-windows");
    let err = client
        .post::<Value, _>("/v1/release-windows/w-1/freeze", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.code, "5002");
    assert_eq!(err.http_status, Some(409));
}

#[tokio::test]
async fn raw_payloads_without_an_envelope_deserialize_directly() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/release-windows")
        .with_status(200)
        .with_body(json!([{"id": "w-1"}, {"id": "w-2"}]).to_string())
        .create_async()
        .await;

    let (_, _, client) = harness(&server.url(), Some("tok"), "/release-windows");
    let windows: Vec<Value> = client.get("/v1/release-windows").await.unwrap();
    assert_eq!(windows.len(), 2);
}
