// =============================================================================
// INTEGRATION TESTS - STATUS SURFACE
// =============================================================================

use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use crate::common::unreachable_client;
use gocd_client::modules::dashboard::{DashboardCrud, DashboardWatcher};
use gocd_client::modules::status::schema::{HealthResponse, VisibilityResponse};
use gocd_client::services::metrics::MetricsRegistry;
use gocd_client::services::poller::{ManualVisibility, PollOperation, Poller, PollerConfig};
use gocd_client::{create_app, AppState};

fn setup_test_server() -> (TestServer, Arc<AppState>) {
    let metrics = MetricsRegistry::new().unwrap();
    let watcher = Arc::new(DashboardWatcher::new(DashboardCrud::new(unreachable_client(), None)));
    let visibility = Arc::new(ManualVisibility::new(false));
    let poller = Poller::new(
        "dashboard",
        PollerConfig::new(60, 30, 4.0),
        watcher.clone(),
        visibility.clone(),
    )
    .with_metrics(metrics.clone());

    let state = Arc::new(AppState {
        metrics,
        watcher,
        visibility,
        poller,
    });
    let server = TestServer::new(create_app(state.clone())).expect("Failed to create test server");
    (server, state)
}

#[tokio::test]
async fn test_root() {
    let (server, _) = setup_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "GoCD Dashboard Watcher");
}

#[tokio::test]
async fn test_health_reports_poller() {
    let (server, state) = setup_test_server();

    let health: HealthResponse = server.get("/health").await.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.poller, "dashboard");
    assert!(!health.poller_running);

    state.poller.start();
    let health: HealthResponse = server.get("/health").await.json();
    assert!(health.poller_running);
    state.poller.stop();
}

#[tokio::test]
async fn test_dashboard_starts_empty() {
    let (server, _) = setup_test_server();

    let response = server.get("/dashboard").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["snapshot"], serde_json::Value::Null);
    assert_eq!(body["polls"], 0);
    assert_eq!(body["failures"], 0);
}

#[tokio::test]
async fn test_dashboard_reports_poll_failure() {
    let (server, state) = setup_test_server();

    assert!(state.watcher.poll().await.is_err());

    let body: serde_json::Value = server.get("/dashboard").await.json();
    assert_eq!(body["failures"], 1);
    assert!(body["last_error"]
        .as_str()
        .unwrap()
        .starts_with("There was an unknown error performing the operation."));
    assert_eq!(state.watcher.state().polls, 1);
}

#[tokio::test]
async fn test_visibility_updates_source_and_keeps_poller_running() {
    let (server, state) = setup_test_server();
    state.poller.start();

    let response = server.post("/visibility").json(&json!({"hidden": true})).await;
    response.assert_status_ok();
    let body: VisibilityResponse = response.json();
    assert!(body.hidden);
    assert!(body.poller_running);

    let body: VisibilityResponse = server
        .post("/visibility")
        .json(&json!({"hidden": false}))
        .await
        .json();
    assert!(!body.hidden);
    state.poller.stop();
}

#[tokio::test]
async fn test_visibility_rejects_bad_payload() {
    let (server, _) = setup_test_server();
    let response = server
        .post("/visibility")
        .json(&json!({"hidden": "maybe"}))
        .expect_failure()
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_metrics_endpoint_exports_surface_metrics() {
    let (server, state) = setup_test_server();

    server.get("/health").await.assert_status_ok();
    state.poller.start();

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("gocd_watch_http_requests_total"));
    assert!(text.contains("endpoint=\"/health\""));
    assert!(text.contains("gocd_poller_running{poller=\"dashboard\"} 1"));
    state.poller.stop();
}

#[tokio::test]
async fn test_unknown_paths_share_one_metrics_label() {
    let (server, _state) = setup_test_server();

    for path in ["/wp-admin", "/.env", "/dashboard/123/extra"] {
        server.get(path).expect_failure().await.assert_status_not_found();
    }

    let text = server.get("/metrics").await.text();
    let unmatched = text
        .lines()
        .find(|line| line.starts_with("gocd_watch_http_requests_total{") && line.contains("endpoint=\"unmatched\""))
        .expect("unmatched requests are counted");
    assert!(unmatched.contains("status=\"404\""));
    assert!(unmatched.ends_with(" 3"));
    assert!(!text.contains("wp-admin"));
    assert!(!text.contains(".env"));
}
