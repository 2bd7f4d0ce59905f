//
//  releasehub-cli
//  tests/guard.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Guard-chain tests: admission decisions across the session states.

use std::sync::Arc;

use serde_json::json;

use releasehub_cli::api::http::ApiClient;
use releasehub_cli::router::{admit, Admission, RouteState};
use releasehub_cli::session::{MemoryTokenStore, PermMode, SessionStore};

fn harness(base_url: &str, token: Option<&str>) -> (Arc<SessionStore>, ApiClient) {
    let storage = match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    };
    let session = Arc::new(SessionStore::load(Box::new(storage), PermMode::Soft));
    let state = Arc::new(RouteState::new("/"));
    let client = ApiClient::new(base_url, session.clone(), state).unwrap();
    (session, client)
}

fn me_body() -> String {
    json!({
        "code": "0",
        "message": "ok",
        "data": {
            "id": "u-1",
            "username": "rel",
            "displayName": "Rel Eng",
            "permissions": ["iteration:read", "run:read"]
        }
    })
    .to_string()
}

#[tokio::test]
async fn without_a_token_screens_redirect_to_login_with_the_target() {
    let server = mockito::Server::new_async().await;
    let (session, client) = harness(&server.url(), None);

    let admission = admit("/iterations?keyword=api", &session, &client).await;
    assert_eq!(
        admission,
        Admission::RedirectLogin {
            redirect: "/iterations?keyword=api".to_string()
        }
    );
}

#[tokio::test]
async fn the_login_screen_passes_without_a_token_and_bounces_home_with_one() {
    let server = mockito::Server::new_async().await;

    let (session, client) = harness(&server.url(), None);
    assert_eq!(admit("/login", &session, &client).await, Admission::Proceed);

    let (session, client) = harness(&server.url(), Some("tok"));
    assert_eq!(
        admit("/login?redirect=%2Fruns", &session, &client).await,
        Admission::RedirectHome
    );
}

#[tokio::test]
async fn a_token_without_a_profile_triggers_the_profile_fetch() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/me")
        .with_status(200)
        .with_body(me_body())
        .create_async()
        .await;

    let (session, client) = harness(&server.url(), Some("tok"));
    assert!(session.profile().is_none());

    let admission = admit("/runs", &session, &client).await;
    assert_eq!(admission, Admission::Proceed);
    assert_eq!(
        session.profile().map(|profile| profile.username),
        Some("rel".to_string())
    );
    assert_eq!(session.permissions().len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn a_loaded_profile_skips_the_refetch() {
    let mut server = mockito::Server::new_async().await;
    // Expect exactly one profile call across two admissions.
    let mock = server
        .mock("GET", "/v1/me")
        .with_status(200)
        .with_body(me_body())
        .expect(1)
        .create_async()
        .await;

    let (session, client) = harness(&server.url(), Some("tok"));
    assert_eq!(admit("/runs", &session, &client).await, Admission::Proceed);
    assert_eq!(
        admit("/iterations", &session, &client).await,
        Admission::Proceed
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn a_rejected_profile_fetch_redirects_to_login_and_tears_down() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/me")
        .with_status(401)
        .with_body("{}")
        .create_async()
        .await;

    let (session, client) = harness(&server.url(), Some("rejected"));
    let admission = admit("/release-windows", &session, &client).await;

    assert_eq!(
        admission,
        Admission::RedirectLogin {
            redirect: "/release-windows".to_string()
        }
    );
    // The rejected token is gone: the next launch starts logged out.
    assert!(session.token().is_none());
}
