//! HTTP front end for the lookup engine.
//!
//! Provides three endpoints:
//! - `/ip-lookup` - batch lookup, one or more `ip` query parameters
//! - `/health` - liveness, provider availability and metrics
//! - `/metrics` - engine and cache counters
//!
//! Every response carries `X-Request-Id` and `X-Response-Time` headers.

mod error;
mod handlers;
mod middleware;
mod types;

use std::future::Future;

use axum::routing::get;
use axum::Router;

use handlers::{health_handler, lookup_handler, metrics_handler};

// Re-export public API
pub use error::ApiError;
pub use middleware::{request_context, REQUEST_ID_HEADER, RESPONSE_TIME_HEADER};
pub use types::{AppState, HealthResponse, LookupResponse, RequestId};

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ip-lookup", get(lookup_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(axum::middleware::from_fn(request_context))
        .with_state(state)
}

/// Binds `address` and serves the router until `shutdown` resolves.
pub async fn start_server<F>(address: &str, state: AppState, shutdown: F) -> Result<(), anyhow::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", address, e))?;

    log::info!("Server listening on http://{}/", address);
    log::info!("  - Lookup: http://{}/ip-lookup?ip=8.8.8.8", address);
    log::info!("  - Health: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    log::info!("Server stopped");
    Ok(())
}
