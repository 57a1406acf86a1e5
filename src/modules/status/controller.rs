use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::schema::{HealthResponse, StatusErrorResponse, VisibilityRequest, VisibilityResponse};
use crate::modules::dashboard::DashboardState;
use crate::services::poller::PageVisibilitySource;
use crate::AppState;

pub async fn root() -> &'static str {
    "GoCD Dashboard Watcher"
}

// =============================================================================
// GET /health
// =============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        poller: state.poller.name().to_string(),
        poller_running: state.poller.is_running(),
    })
}

// =============================================================================
// GET /metrics - Prometheus text format
// =============================================================================

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.export() {
        Ok(output) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            output,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusErrorResponse::new(format!("Failed to export metrics: {}", e))),
        )
            .into_response(),
    }
}

// =============================================================================
// GET /dashboard - latest known dashboard state
// =============================================================================

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardState> {
    Json(state.watcher.state())
}

// =============================================================================
// POST /visibility - host reports whether the page is hidden
// =============================================================================

pub async fn set_visibility(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VisibilityRequest>,
) -> Json<VisibilityResponse> {
    state.visibility.set_hidden(request.hidden);

    Json(VisibilityResponse {
        hidden: state.visibility.is_hidden(),
        poller_running: state.poller.is_running(),
    })
}
