use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use super::collectors::HttpMetricsCollector;
use super::MetricsRegistry;

/// Label for requests that matched no route, so scanners cannot grow the label set.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Records `gocd_watch_http_*` for every request the status surface serves,
/// labelled by route template rather than raw path.
pub async fn metrics_middleware(
    State(metrics): State<Arc<MetricsRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string());

    let response = next.run(req).await;

    HttpMetricsCollector::new(metrics).record_request(
        method.as_str(),
        &endpoint,
        response.status().as_u16(),
        started.elapsed(),
    );

    response
}
