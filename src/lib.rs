pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use modules::dashboard::DashboardWatcher;
use modules::status::status_routes;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::poller::{ManualVisibility, Poller};

pub struct AppState {
    pub metrics: Arc<MetricsRegistry>,
    pub watcher: Arc<DashboardWatcher>,
    pub visibility: Arc<ManualVisibility>,
    pub poller: Poller,
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .merge(status_routes())
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
