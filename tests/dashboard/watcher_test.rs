// =============================================================================
// INTEGRATION TESTS - DASHBOARD WATCHER
// Etag round-trip, 304 handling and error reporting against a mock server
// =============================================================================

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{sample_dashboard_json, MockGocd};
use gocd_client::modules::dashboard::{DashboardCrud, DashboardWatcher};
use gocd_client::services::poller::{AlwaysVisible, PollOperation, Poller, PollerConfig};

async fn dashboard_handler(headers: HeaderMap) -> Response {
    let etag = headers.get("if-none-match").and_then(|v| v.to_str().ok());
    if etag == Some("\"dash-1\"") {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    (
        StatusCode::OK,
        [("ETag", "\"dash-1--gzip\"")],
        Json(sample_dashboard_json()),
    )
        .into_response()
}

fn dashboard_router() -> Router {
    Router::new().route("/go/api/dashboard", get(dashboard_handler))
}

#[tokio::test]
async fn test_fetch_uses_v4_and_view_name() {
    let server = MockGocd::start(dashboard_router()).await;
    let crud = DashboardCrud::new(server.client(), Some("my view".to_string()));

    let result = crud.fetch(None).await;
    assert!(result.is_success());

    let fetched = result.into_result().unwrap();
    assert_eq!(fetched.etag.as_deref(), Some("\"dash-1\""));
    assert_eq!(fetched.object.pipeline("up42").unwrap().latest_instance().unwrap().counter, 7);

    let request = server.last_request();
    assert_eq!(request.header("accept"), Some("application/vnd.go.cd.v4+json"));
    let query = request.query.unwrap();
    assert!(query.contains("viewName=my+view"), "{}", query);
    assert!(query.contains("allowEmpty=false"), "{}", query);
}

#[tokio::test]
async fn test_watcher_sends_last_etag_and_keeps_snapshot_on_304() {
    let server = MockGocd::start(dashboard_router()).await;
    let watcher = DashboardWatcher::new(DashboardCrud::new(server.client(), None));

    watcher.poll().await.unwrap();
    let first = watcher.state();
    let snapshot = first.snapshot.clone().unwrap();
    assert_eq!(snapshot.etag.as_deref(), Some("\"dash-1\""));
    assert_eq!(first.polls, 1);

    watcher.poll().await.unwrap();
    let second = watcher.state();
    assert_eq!(second.polls, 2);
    assert_eq!(second.snapshot, Some(snapshot));
    assert!(second.last_error.is_none());

    let requests = server.requests();
    assert!(requests[0].header("if-none-match").is_none());
    assert_eq!(requests[1].header("if-none-match"), Some("\"dash-1\""));
}

#[tokio::test]
async fn test_watcher_records_failure_and_recovers() {
    let server = MockGocd::start(Router::new().route(
        "/go/api/dashboard",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"message": "Server is in maintenance mode"})),
            )
        }),
    ))
    .await;
    let watcher = DashboardWatcher::new(DashboardCrud::new(server.client(), None));

    let err = watcher.poll().await.unwrap_err();
    assert_eq!(err.to_string(), "Server is in maintenance mode");

    let state = watcher.state();
    assert_eq!(state.failures, 1);
    assert_eq!(state.last_error.as_deref(), Some("Server is in maintenance mode"));
    assert!(state.snapshot.is_none());

    let healthy = MockGocd::start(dashboard_router()).await;
    let watcher = DashboardWatcher::new(DashboardCrud::new(healthy.client(), None));
    watcher.poll().await.unwrap();
    assert!(watcher.state().last_error.is_none());
}

#[tokio::test]
async fn test_unparseable_dashboard_is_reported() {
    let server = MockGocd::start(Router::new().route(
        "/go/api/dashboard",
        get(|| async { (StatusCode::OK, "<html>login</html>") }),
    ))
    .await;
    let watcher = DashboardWatcher::new(DashboardCrud::new(server.client(), None));

    assert!(watcher.poll().await.is_err());
    let state = watcher.state();
    assert!(state.last_error.unwrap().starts_with("Failed to parse response"));
}

#[tokio::test]
async fn test_poller_drives_watcher_and_publishes() {
    let server = MockGocd::start(dashboard_router()).await;
    let watcher = Arc::new(DashboardWatcher::new(DashboardCrud::new(server.client(), None)));
    let mut updates = watcher.subscribe();

    let poller = Poller::new(
        "dashboard",
        PollerConfig::new(60, 0, 4.0),
        watcher.clone(),
        Arc::new(AlwaysVisible),
    );
    poller.start();

    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("No dashboard update published")
        .unwrap();
    poller.stop();

    let state = updates.borrow().clone();
    assert_eq!(state.polls, 1);
    assert_eq!(state.snapshot.unwrap().dashboard.pipelines().len(), 1);
}
