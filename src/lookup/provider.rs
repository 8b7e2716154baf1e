//! The provider capability consumed by the lookup engine.

use async_trait::async_trait;

use super::ProviderResponse;
use crate::error_handling::ProviderError;

/// A pluggable source of IP metadata.
///
/// The engine guarantees `ip` is non-empty; providers apply any stricter
/// format checks themselves.
#[async_trait]
pub trait IpLookupProvider: Send + Sync {
    /// Stable, unique, human-readable name.
    ///
    /// Lowercased, it is both the cache-key segment and the result-map key.
    fn name(&self) -> &str;

    /// Prepares the provider (loads databases, probes remote APIs).
    async fn initialise(&self) -> Result<(), ProviderError>;

    /// Whether the provider can serve lookups. Never fails.
    async fn is_available(&self) -> bool;

    /// Looks up one address. `Ok(None)` means the provider had nothing to say.
    async fn lookup(&self, ip: &str) -> Result<Option<ProviderResponse>, ProviderError>;
}
