//! Server state and response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::lookup::{BatchLimits, IpLookupResult, IpLookupService, MetricsSnapshot, ProviderStatus};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Lookup engine shared by all handlers
    pub service: Arc<IpLookupService>,
    /// Batch size and deadline applied to `/ip-lookup`
    pub limits: BatchLimits,
    /// Pre-rendered `Cache-Control` value for lookup responses
    pub cache_control: String,
}

/// Correlation id attached to every request by the request-context middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// JSON response for `/ip-lookup`
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    /// One entry per requested address, in request order
    pub results: Vec<IpLookupResult>,
}

/// JSON response for `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: &'static str,
    /// Time the report was produced
    pub timestamp: DateTime<Utc>,
    /// Availability of each registered provider
    pub providers: Vec<ProviderStatus>,
    /// Engine and cache counters
    pub metrics: MetricsSnapshot,
}
