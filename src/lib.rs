//! ip_lookup library: multi-provider IP address metadata lookups
//!
//! This library resolves IP addresses into geolocation and network ownership
//! data by consulting several providers in priority order, caching each
//! provider's answer separately, and merging the results per address.
//!
//! # Example
//!
//! ```no_run
//! use ip_lookup::lookup::{lookup_batch, BatchLimits};
//! use ip_lookup::initialization::build_lookup_service;
//! use ip_lookup::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = build_lookup_service(&Config::default()).await?;
//! let ips = vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()];
//!
//! for result in lookup_batch(&service, &ips, BatchLimits::default()).await? {
//!     println!("{} -> {:?}", result.ip, result.providers.keys().collect::<Vec<_>>());
//! }
//! service.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod lookup;
pub mod providers;
pub mod server;
pub mod utils;
pub mod validation;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{LookupError, ProviderError};
pub use lookup::{IpLookupProvider, IpLookupResult, IpLookupService};
