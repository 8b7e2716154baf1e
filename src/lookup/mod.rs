//! IP lookup aggregation.
//!
//! This module provides:
//! - The [`IpLookupProvider`] capability implemented by data sources
//! - [`IpLookupService`], which fans a lookup out across providers in order,
//!   caches each provider's response separately, and merges the results
//! - [`lookup_batch`], which runs many lookups concurrently under a single
//!   wall-clock deadline
//!
//! # Failure model
//!
//! A provider failure only fails a lookup when every provider failed or was
//! unavailable. A failed address only fails a batch when the batch deadline
//! elapses; otherwise it becomes an entry carrying an `error` message.

mod batch;
mod provider;
mod service;
#[cfg(test)]
pub(crate) mod test_support;
mod types;

// Re-export public API
pub use batch::{lookup_batch, BatchLimits};
pub use provider::IpLookupProvider;
pub use service::IpLookupService;
pub use types::{
    cache_key, CacheMetrics, IpLookupResult, MetricsSnapshot, ProviderResponse, ProviderStatus,
};
