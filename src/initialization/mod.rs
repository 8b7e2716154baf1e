//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger (plain or JSON output)
//! - HTTP client for remote providers
//! - The lookup service with its cache and providers
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use anyhow::Context;
use log::info;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::lookup::{IpLookupProvider, IpLookupService};
use crate::providers::{IpInfoProvider, MaxMindPaths, MaxMindProvider};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Builds and initialises the lookup service described by `config`.
///
/// Providers are registered in priority order: the local MaxMind databases
/// first, then the IPInfo API. Fails only when no provider initialises.
///
/// Must be called from within a Tokio runtime; the cache spawns its
/// expiry sweeper on construction.
pub async fn build_lookup_service(config: &Config) -> anyhow::Result<Arc<IpLookupService>> {
    let cache = MemoryCache::new(config.cache_options()?).context("Failed to create cache")?;

    let providers: Vec<Arc<dyn IpLookupProvider>> = vec![
        Arc::new(MaxMindProvider::new(MaxMindPaths::in_dir(
            &config.maxmind_data_dir,
        ))),
        Arc::new(IpInfoProvider::new(
            init_client().context("Failed to create HTTP client")?,
            config.ipinfo_base_url.clone(),
            config.ipinfo_api_token.clone(),
        )),
    ];

    let service = Arc::new(IpLookupService::new(providers, Arc::new(cache)));
    service
        .initialise()
        .await
        .context("Failed to initialise lookup service")?;
    info!("Lookup service initialised");
    Ok(service)
}
