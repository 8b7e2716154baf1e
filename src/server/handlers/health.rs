//! Health handler.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use super::super::types::{AppState, HealthResponse};

/// `GET /health`: liveness plus provider availability and metrics.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (providers, metrics) = tokio::join!(
        state.service.get_provider_status(),
        state.service.get_metrics()
    );
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        providers,
        metrics,
    })
}
