//! Lookup data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error_handling::LastError;

/// One provider's answer for one address.
///
/// Cached verbatim, generation timestamp included, under
/// `{ip}:{lowercased provider name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    /// Address the response describes.
    pub ip: String,
    /// Provider-specific payload.
    pub data: Value,
    /// When the provider produced this response.
    pub last_updated: DateTime<Utc>,
}

impl ProviderResponse {
    /// Creates a response stamped with the current time.
    pub fn new(ip: impl Into<String>, data: Value) -> Self {
        Self {
            ip: ip.into(),
            data,
            last_updated: Utc::now(),
        }
    }
}

/// Consolidated result for one address.
///
/// `providers` holds an entry for every provider that contributed data.
/// `error` is set on partial success, or on a batch entry whose lookup failed
/// outright (in which case `providers` is empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpLookupResult {
    /// Address that was looked up.
    pub ip: String,
    /// Provider data keyed by lowercased provider name, in provider order.
    pub providers: Map<String, Value>,
    /// When the result was assembled.
    pub last_updated: DateTime<Utc>,
    /// Semicolon-joined failure messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IpLookupResult {
    /// Builds the placeholder entry used when a batch address fails outright.
    pub fn failed(ip: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            providers: Map::new(),
            last_updated: Utc::now(),
            error: Some(error.into()),
        }
    }
}

/// Availability of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    /// Provider name.
    pub name: String,
    /// Whether the provider can currently serve lookups.
    pub available: bool,
}

/// Cache counters as reported alongside lookup metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Reads that found a live entry.
    pub hits: u64,
    /// Reads that found nothing.
    pub misses: u64,
    /// Live entries.
    pub keys: u64,
}

/// Snapshot of engine and cache counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Calls to `lookup`, whatever their outcome.
    pub total_requests: u64,
    /// Calls to `lookup` that failed outright.
    pub errors: u64,
    /// Live cache counters.
    pub cache: CacheMetrics,
    /// Most recent outright failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<LastError>,
}

/// Cache key for one provider's response for one address.
pub fn cache_key(ip: &str, provider_name: &str) -> String {
    format!("{}:{}", ip, provider_name.to_lowercase())
}
