use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn status_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(controller::root))
        .route("/health", get(controller::health_check))
        .route("/metrics", get(controller::get_metrics))
        .route("/dashboard", get(controller::get_dashboard))
        .route("/visibility", post(controller::set_visibility))
}
