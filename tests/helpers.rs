// Shared test helpers for building lookup services from scripted providers.
//
// Integration tests only see the public API, so providers are defined here
// rather than reused from the crate's unit-test support.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ip_lookup::cache::{CacheOptions, MemoryCache};
use ip_lookup::lookup::ProviderResponse;
use ip_lookup::{IpLookupProvider, IpLookupService, ProviderError};

/// A provider whose answer is fixed at construction.
pub struct ScriptedProvider {
    name: &'static str,
    answer: Result<Value, ProviderError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

#[allow(dead_code)] // Not every test file uses every helper
impl ScriptedProvider {
    pub fn ok(name: &'static str, data: Value) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer: Ok(data),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &'static str, error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn slow(name: &'static str, data: Value, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer: Ok(data),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpLookupProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn initialise(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn lookup(&self, ip: &str) -> Result<Option<ProviderResponse>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer
            .clone()
            .map(|data| Some(ProviderResponse::new(ip, data)))
    }
}

/// Builds an initialised service over `providers` with a default cache.
#[allow(dead_code)]
pub async fn service_with(providers: Vec<Arc<dyn IpLookupProvider>>) -> Arc<IpLookupService> {
    let cache = MemoryCache::new(CacheOptions::default()).expect("valid cache options");
    let service = Arc::new(IpLookupService::new(providers, Arc::new(cache)));
    service.initialise().await.expect("providers initialise");
    service
}
