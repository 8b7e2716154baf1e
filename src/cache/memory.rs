//! In-process cache backed by `moka`.
//!
//! Entries carry their own TTL through a custom [`Expiry`], so `set` can
//! override the default per call. A background task runs moka's pending
//! maintenance every check period so expired entries are actually dropped
//! rather than only hidden from reads.

use async_trait::async_trait;
use log::{debug, info, warn};
use moka::future::Cache as MokaCache;
use moka::notification::RemovalCause;
use moka::Expiry;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{Cache, CacheOptions, CacheStats};
use crate::error_handling::{CacheError, LastErrorSlot};

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct EntryTtl;

impl<V> Expiry<String, Entry<V>> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    // Overwrites restart the clock with the new entry's TTL
    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process [`Cache`] implementation.
///
/// Must be constructed inside a Tokio runtime (it spawns its sweeper task).
/// `max_keys` is a hard cap: writing a new key to a full cache is rejected
/// instead of evicting an existing entry.
pub struct MemoryCache<V> {
    store: MokaCache<String, Entry<V>>,
    options: CacheOptions,
    hits: AtomicU64,
    misses: AtomicU64,
    last_error: LastErrorSlot,
    closed: AtomicBool,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    // Serialises the capacity check with the insert it guards
    write_lock: AsyncMutex<()>,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache, failing fast on invalid options.
    pub fn new(options: CacheOptions) -> Result<Self, CacheError> {
        options.validate()?;

        let store = MokaCache::builder()
            .max_capacity(options.max_keys)
            .expire_after(EntryTtl)
            .eviction_listener(|key: Arc<String>, _entry: Entry<V>, cause: RemovalCause| {
                match cause {
                    RemovalCause::Expired => debug!("Cache entry expired: {}", key),
                    RemovalCause::Size => warn!("Cache entry evicted for size: {}", key),
                    RemovalCause::Explicit | RemovalCause::Replaced => {}
                }
            })
            .build();

        let sweeper = spawn_sweeper(store.clone(), options.check_period);

        info!(
            "Cache initialized: ttl={}s, check_period={}s, max_keys={}",
            options.ttl.as_secs(),
            options.check_period.as_secs(),
            options.max_keys
        );

        Ok(Self {
            store,
            options,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            last_error: LastErrorSlot::default(),
            closed: AtomicBool::new(false),
            sweeper: Mutex::new(Some(sweeper)),
            write_lock: AsyncMutex::new(()),
        })
    }

    /// Returns the options this cache was built with.
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    fn record_failure(&self, key: &str, error: CacheError) {
        warn!("Cache set failed for key {}: {}", key, error);
        self.last_error.record(error.to_string());
    }

    fn stop_sweeper(&self) {
        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

fn spawn_sweeper<V>(store: MokaCache<String, Entry<V>>, period: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            store.run_pending_tasks().await;
            debug!("Cache sweep complete: {} live entries", store.entry_count());
        }
    })
}

#[async_trait]
impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        match self.store.get(key).await {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> bool {
        if self.closed.load(Ordering::Acquire) {
            self.record_failure(key, CacheError::Closed);
            return false;
        }

        let ttl = ttl.filter(|t| !t.is_zero()).unwrap_or(self.options.ttl);

        let _guard = self.write_lock.lock().await;
        if !self.store.contains_key(key) {
            // entry_count is only exact once pending writes and expiries are applied
            self.store.run_pending_tasks().await;
            if self.store.entry_count() >= self.options.max_keys {
                self.record_failure(
                    key,
                    CacheError::CapacityExceeded {
                        max_keys: self.options.max_keys,
                    },
                );
                return false;
            }
        }

        self.store
            .insert(key.to_string(), Entry { value, ttl })
            .await;
        true
    }

    async fn del(&self, key: &str) -> usize {
        match self.store.remove(key).await {
            Some(_) => 1,
            None => 0,
        }
    }

    async fn flush(&self) {
        self.store.invalidate_all();
        self.store.run_pending_tasks().await;
        debug!("Cache flushed");
    }

    async fn get_metrics(&self) -> CacheStats {
        self.store.run_pending_tasks().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            keys: self.store.entry_count(),
            last_error: self.last_error.get(),
        }
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.stop_sweeper();
        info!("Cache closed");
    }
}

impl<V> Drop for MemoryCache<V> {
    fn drop(&mut self) {
        let handle = self
            .sweeper
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}
