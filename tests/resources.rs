//
//  releasehub-cli
//  tests/resources.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Resource-client tests: request shapes, reply-shape tolerance, and the
//! client-side pagination fallback.

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use releasehub_cli::api::common::{PageQuery, PaginationMode};
use releasehub_cli::api::http::ApiClient;
use releasehub_cli::api::{branch_rules, iterations, release_windows, runs};
use releasehub_cli::router::RouteState;
use releasehub_cli::session::{MemoryTokenStore, PermMode, SessionStore};

fn client(base_url: &str) -> ApiClient {
    let session = Arc::new(SessionStore::load(
        Box::new(MemoryTokenStore::with_token("tok")),
        PermMode::Soft,
    ));
    let state = Arc::new(RouteState::new("/"));
    ApiClient::new(base_url, session, state).unwrap()
}

fn envelope(data: serde_json::Value) -> String {
    json!({"code": "0", "message": "ok", "data": data}).to_string()
}

#[test]
fn pagination_capabilities_match_the_backing_endpoints() {
    use releasehub_cli::api::{repositories, version_policies};

    // `/paged`-style endpoints slice on the server; the legacy full-list
    // endpoints slice in the client.
    assert_eq!(iterations::PAGINATION, PaginationMode::Server);
    assert_eq!(repositories::PAGINATION, PaginationMode::Server);
    assert_eq!(runs::PAGINATION, PaginationMode::Server);
    assert_eq!(branch_rules::PAGINATION, PaginationMode::Server);
    assert_eq!(release_windows::PAGINATION, PaginationMode::Client);
    assert_eq!(version_policies::PAGINATION, PaginationMode::Client);
}

#[tokio::test]
async fn iteration_list_sends_one_based_page_params() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/iterations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("size".into(), "25".into()),
            Matcher::UrlEncoded("keyword".into(), "api".into()),
        ]))
        .with_status(200)
        .with_body(envelope(json!({
            "list": [{"iterationKey": "it-26", "repoCount": 3, "mountedWindows": 1}],
            "total": 26
        })))
        .create_async()
        .await;

    let client = client(&server.url());
    let mut query = PageQuery::new(iterations::IterationFilter {
        keyword: Some("api".to_string()),
    });
    query.page = 2;
    query.page_size = 25;

    let page = iterations::list(&client, &query).await.unwrap();
    assert_eq!(page.total, 26);
    assert_eq!(page.list[0].iteration_key, "it-26");
    mock.assert_async().await;
}

#[tokio::test]
async fn iteration_list_tolerates_the_legacy_bare_array_reply() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/iterations")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(envelope(json!([
            {"iterationKey": "it-1"},
            {"iterationKey": "it-2"},
            {"iterationKey": "it-3"}
        ])))
        .create_async()
        .await;

    let client = client(&server.url());
    let page = iterations::list(&client, &PageQuery::default()).await.unwrap();

    // The legacy shape reports its own length as the total.
    assert_eq!(page.total, 3);
    assert_eq!(page.list.len(), 3);
}

#[tokio::test]
async fn release_window_list_filters_and_slices_client_side() {
    let mut server = mockito::Server::new_async().await;
    let windows: Vec<_> = (1..=25)
        .map(|index| {
            json!({
                "id": format!("w-{index}"),
                "windowKey": format!("2026-{index:02}"),
                "name": if index % 2 == 0 { format!("regular {index}") } else { format!("hotfix {index}") },
                "status": "OPEN",
                "createdAt": "2026-01-01T00:00:00Z",
                "updatedAt": "2026-01-01T00:00:00Z",
                "frozen": false
            })
        })
        .collect();
    server
        .mock("GET", "/v1/release-windows")
        .with_status(200)
        .with_body(envelope(json!(windows)))
        .expect(2)
        .create_async()
        .await;

    let client = client(&server.url());

    // Unfiltered: 25 windows, page 3 of size 10 holds the last 5.
    let mut query = PageQuery::new(release_windows::ReleaseWindowFilter::default());
    query.page = 3;
    let page = release_windows::list(&client, &query).await.unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.list.len(), 5);

    // Filtered: total reflects the filtered count before slicing.
    let mut query = PageQuery::new(release_windows::ReleaseWindowFilter {
        name: Some("regular".to_string()),
        status: None,
    });
    query.page_size = 5;
    let page = release_windows::list(&client, &query).await.unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.list.len(), 5);
}

#[tokio::test]
async fn runs_paged_reply_normalizes_to_a_page_result() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/runs/paged")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("status".into(), "FAILED".into()),
        ]))
        .with_status(200)
        .with_body(envelope(json!({
            "data": [{
                "id": "run-7",
                "type": "WINDOW_ORCHESTRATION",
                "status": "FAILED",
                "startedAt": "2026-02-10T08:00:00Z",
                "endedAt": "2026-02-10T08:01:00Z"
            }],
            "page": {"page": 1, "size": 10, "total": 41}
        })))
        .create_async()
        .await;

    let client = client(&server.url());
    let query = PageQuery::new(runs::RunFilter {
        status: Some(runs::RunStatus::Failed),
        ..runs::RunFilter::default()
    });

    let page = runs::list(&client, &query).await.unwrap();
    assert_eq!(page.total, 41);
    assert_eq!(page.list[0].status, runs::RunStatus::Failed);
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_run_statuses_deserialize_without_failing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/runs/run-9")
        .with_status(200)
        .with_body(envelope(json!({
            "id": "run-9",
            "type": "SCAN",
            "status": "QUARANTINED"
        })))
        .create_async()
        .await;

    let client = client(&server.url());
    let detail = runs::get(&client, "run-9").await.unwrap();
    assert_eq!(detail.summary.status, runs::RunStatus::Unknown);
}

#[tokio::test]
async fn window_attach_posts_the_iteration_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/release-windows/w-3/attach")
        .match_body(Matcher::Json(json!({"iterationKey": "2026-q1"})))
        .with_status(200)
        .with_body(envelope(json!({
            "id": "w-3",
            "windowKey": "2026-03",
            "name": "March",
            "status": "OPEN",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z",
            "frozen": false
        })))
        .create_async()
        .await;

    let client = client(&server.url());
    let window = release_windows::attach(&client, "w-3", "2026-q1").await.unwrap();
    assert_eq!(window.window_key, "2026-03");
    mock.assert_async().await;
}

#[tokio::test]
async fn branch_rule_paged_list_goes_through_the_paged_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/branch-rules/paged")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("size".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(envelope(json!({
            "data": [{
                "id": "br-1",
                "name": "Release Branches",
                "type": "TEMPLATE",
                "pattern": "release/{version}",
                "scope": {"level": "GLOBAL"},
                "status": "ENABLED",
                "updatedAt": "2026-02-01T00:00:00Z"
            }],
            "page": {"page": 1, "size": 10, "total": 4}
        })))
        .create_async()
        .await;

    let client = client(&server.url());
    let page = branch_rules::list(&client, &PageQuery::default()).await.unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(page.list[0].rule_type, branch_rules::BranchRuleType::Template);
    mock.assert_async().await;
}
