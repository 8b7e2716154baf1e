//! The lookup aggregation engine.

use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use log::{debug, error, info, warn};
use serde_json::Map;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{
    cache_key, CacheMetrics, IpLookupProvider, IpLookupResult, MetricsSnapshot, ProviderResponse,
    ProviderStatus,
};
use crate::cache::Cache;
use crate::error_handling::{LastErrorSlot, LookupError, ProviderError, ProviderFailure};
use crate::utils::sanitize_and_truncate_error_message;

/// Aggregates lookups across an ordered set of providers.
///
/// Provider order is fixed at construction and is the order in which
/// providers are attempted for each address. Each provider's response is
/// cached independently, so a failing provider never invalidates a sibling's
/// cached data.
///
/// # Thread Safety
///
/// Counters are atomic; share the service across tasks with `Arc`.
pub struct IpLookupService {
    providers: Vec<Arc<dyn IpLookupProvider>>,
    cache: Arc<dyn Cache<ProviderResponse>>,
    total_requests: AtomicU64,
    errors: AtomicU64,
    last_error: LastErrorSlot,
}

impl IpLookupService {
    /// Creates an engine over `providers` (in attempt order) and a shared cache.
    pub fn new(
        providers: Vec<Arc<dyn IpLookupProvider>>,
        cache: Arc<dyn Cache<ProviderResponse>>,
    ) -> Self {
        Self {
            providers,
            cache,
            total_requests: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            last_error: LastErrorSlot::default(),
        }
    }

    /// Initialises every provider concurrently.
    ///
    /// Individual failures are logged and tolerated. Fails only when no
    /// provider initialised successfully.
    pub async fn initialise(&self) -> Result<(), LookupError> {
        let outcomes = join_all(self.providers.iter().map(|provider| async move {
            let outcome = AssertUnwindSafe(provider.initialise())
                .catch_unwind()
                .await
                .unwrap_or(Err(ProviderError::Panicked));
            (provider.name(), outcome)
        }))
        .await;

        let mut ready = 0usize;
        for (name, outcome) in outcomes {
            match outcome {
                Ok(()) => {
                    info!("Provider {} initialised", name);
                    ready += 1;
                }
                Err(e) => error!("Failed to initialise provider {}: {}", name, e),
            }
        }

        if ready == 0 {
            error!("No lookup provider could be initialised");
            return Err(LookupError::ProvidersUnavailable);
        }

        info!(
            "Lookup service ready: {}/{} providers initialised",
            ready,
            self.providers.len()
        );
        Ok(())
    }

    /// Looks up one address across all available providers.
    ///
    /// Returns a result as long as at least one provider contributed data;
    /// failures of the others are summarised in the result's `error` field.
    pub async fn lookup(&self, ip: &str) -> Result<IpLookupResult, LookupError> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let result = self.lookup_inner(ip).await;
        if let Err(e) = &result {
            self.errors.fetch_add(1, Ordering::Relaxed);
            self.last_error.record(e.to_string());
            error!("Lookup failed for {}: {}", ip, e);
        }
        result
    }

    async fn lookup_inner(&self, ip: &str) -> Result<IpLookupResult, LookupError> {
        if ip.is_empty() {
            return Err(LookupError::InvalidInput(
                "IP address is required".to_string(),
            ));
        }

        let mut contributions = Map::new();
        let mut failures = Vec::new();

        for provider in &self.providers {
            let name = provider.name();
            if !provider.is_available().await {
                debug!("Skipping unavailable provider {} for {}", name, ip);
                continue;
            }

            let key = cache_key(ip, name);
            if let Some(cached) = self.cache.get(&key).await {
                debug!("Cache hit for {}", key);
                contributions.insert(name.to_lowercase(), cached.data);
                continue;
            }

            match invoke(provider.as_ref(), ip).await {
                Ok(response) => {
                    if !self.cache.set(&key, response.clone(), None).await {
                        warn!("Could not cache response for {}", key);
                    }
                    contributions.insert(name.to_lowercase(), response.data);
                }
                Err(source) => {
                    let failure = ProviderFailure {
                        provider: name.to_string(),
                        ip: ip.to_string(),
                        source,
                    };
                    warn!("{}", failure);
                    failures.push(failure);
                }
            }
        }

        if contributions.is_empty() {
            return Err(LookupError::AllProvidersFailed {
                ip: ip.to_string(),
                failures,
            });
        }

        let error = if failures.is_empty() {
            None
        } else {
            let joined = failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Some(sanitize_and_truncate_error_message(&joined))
        };

        Ok(IpLookupResult {
            ip: ip.to_string(),
            providers: contributions,
            last_updated: Utc::now(),
            error,
        })
    }

    /// Returns engine counters merged with live cache counters.
    pub async fn get_metrics(&self) -> MetricsSnapshot {
        let cache = self.cache.get_metrics().await;
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            cache: CacheMetrics {
                hits: cache.hits,
                misses: cache.misses,
                keys: cache.keys,
            },
            last_error: self.last_error.get(),
        }
    }

    /// Polls every provider's availability concurrently, in provider order.
    pub async fn get_provider_status(&self) -> Vec<ProviderStatus> {
        join_all(self.providers.iter().map(|provider| async move {
            ProviderStatus {
                name: provider.name().to_string(),
                available: provider.is_available().await,
            }
        }))
        .await
    }

    /// Releases the cache. Providers have nothing to release.
    pub async fn close(&self) {
        self.cache.close().await;
    }
}

/// Calls one provider, folding empty results and panics into errors.
async fn invoke(provider: &dyn IpLookupProvider, ip: &str) -> Result<ProviderResponse, ProviderError> {
    match AssertUnwindSafe(provider.lookup(ip)).catch_unwind().await {
        Ok(Ok(Some(response))) => Ok(response),
        Ok(Ok(None)) => Err(ProviderError::EmptyResult),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ProviderError::Panicked),
    }
}
