//! Response caching.
//!
//! This module provides:
//! - The [`Cache`] trait, so the engine can run against alternate backends
//! - [`MemoryCache`], the in-process backend built on `moka`
//! - Construction options with eager validation, and a stats snapshot type
//!
//! Caches never fail outward after construction: a miss is `None`, and a
//! store fault is logged, recorded as `last_error`, and reported as `false`
//! from [`Cache::set`].

mod memory;
mod types;

use async_trait::async_trait;
use std::time::Duration;

pub use memory::MemoryCache;
pub use types::{CacheOptions, CacheStats};

/// A key/value store with per-entry time-to-live and usage counters.
///
/// Implementations must be safe for concurrent use from many lookups.
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Returns the live value for `key`, counting a hit or a miss.
    async fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key`.
    ///
    /// `ttl` of `None` or zero means the store's default TTL, not "never
    /// expire". Returns `false` if the store rejected the write.
    async fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> bool;

    /// Removes `key`, returning how many entries were removed (0 or 1).
    async fn del(&self, key: &str) -> usize;

    /// Removes every entry.
    async fn flush(&self);

    /// Returns a snapshot of the usage counters.
    async fn get_metrics(&self) -> CacheStats;

    /// Releases background resources. Later writes are rejected.
    async fn close(&self);
}
