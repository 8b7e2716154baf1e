//! Metrics handler.

use axum::extract::State;
use axum::Json;

use super::super::types::AppState;
use crate::lookup::MetricsSnapshot;

/// `GET /metrics`: engine and cache counters as JSON.
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.service.get_metrics().await)
}
