//! Error type definitions.
//!
//! This module defines the error types used throughout the service, one enum
//! per component boundary.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// A failure reported by a single provider.
///
/// Messages are provider-neutral; the engine adds provider and IP context
/// when it records the failure (see [`ProviderFailure`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be initialised.
    #[error("initialisation failed: {0}")]
    Init(String),

    /// An empty address was passed to the provider.
    #[error("IP address is required")]
    MissingAddress,

    /// The address is not a supported IPv4/IPv6 format.
    #[error("Invalid IP address format: {0}")]
    InvalidAddress(String),

    /// The provider cannot serve lookups right now.
    #[error("provider not available: {0}")]
    Unavailable(String),

    /// None of the provider's data sources know the address.
    #[error("No data found for IP {0} in any database")]
    NoData(String),

    /// The provider's upstream request failed.
    #[error("{0}")]
    Request(String),

    /// The provider completed without producing a result.
    #[error("returned no result")]
    EmptyResult,

    /// The provider's lookup future panicked.
    #[error("panicked during lookup")]
    Panicked,
}

/// A provider failure with the provider name and IP that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Provider {provider} lookup failed for {ip}: {source}")]
pub struct ProviderFailure {
    /// Provider name as registered with the engine.
    pub provider: String,
    /// Address being looked up.
    pub ip: String,
    /// Underlying provider error.
    pub source: ProviderError,
}

/// Errors surfaced by the lookup engine and the batch boundary.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Empty or malformed input reached a component that needs an address.
    #[error("{0}")]
    InvalidInput(String),

    /// The batch exceeds the configured per-request maximum.
    #[error("Maximum of {max} IPs allowed per request")]
    TooManyAddresses {
        /// Configured cap.
        max: usize,
        /// Number of addresses in the rejected request.
        requested: usize,
    },

    /// No provider initialised successfully.
    #[error("Failed to initialise all providers")]
    ProvidersUnavailable,

    /// Every provider failed or was unavailable for one address.
    #[error("All providers failed to lookup IP {ip}{}", join_failures(.failures))]
    AllProvidersFailed {
        /// Address that could not be resolved.
        ip: String,
        /// Individual provider failures, in provider order.
        failures: Vec<ProviderFailure>,
    },

    /// The whole-batch wall-clock budget elapsed.
    #[error("Request timeout after {timeout_ms}ms")]
    RequestTimeout {
        /// Configured budget in milliseconds.
        timeout_ms: u64,
    },
}

impl LookupError {
    /// Returns true for errors caused by the caller's input.
    ///
    /// The HTTP layer maps these to a client error status.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LookupError::InvalidInput(_) | LookupError::TooManyAddresses { .. }
        )
    }
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    if failures.is_empty() {
        String::new()
    } else {
        let messages: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
        format!(" ({})", messages.join("; "))
    }
}

/// Errors raised by cache backends.
///
/// Only `InvalidConfig` escapes a cache (at construction). The others are
/// absorbed and surface as a `false` return from `set` plus `last_error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A construction option is zero.
    #[error("Cache {field} must be a positive integer")]
    InvalidConfig {
        /// Human-readable option name.
        field: &'static str,
    },

    /// A new key was rejected because the cache is full.
    #[error("Cache max keys amount exceeded ({max_keys})")]
    CapacityExceeded {
        /// Configured key cap.
        max_keys: u64,
    },

    /// The cache was closed.
    #[error("Cache is closed")]
    Closed,
}
