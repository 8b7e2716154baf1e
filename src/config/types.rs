//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. Every option can also be supplied through the
//! environment variable named in its `env` attribute.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::cache::CacheOptions;
use crate::config::constants::*;
use crate::error_handling::CacheError;
use crate::lookup::BatchLimits;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Service configuration.
///
/// Parsed from flags and environment variables by `clap`, or constructed
/// programmatically via [`Default`].
///
/// # Examples
///
/// ```bash
/// # Defaults: 0.0.0.0:3000, databases in ./data
/// ip_lookup
///
/// # Remote provider enabled, smaller batches
/// IPINFO_API_TOKEN=... ip_lookup --port 8080 --max-ips-per-request 10
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ip_lookup",
    about = "Resolves IP addresses into geolocation and ASN metadata from several providers."
)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, env = "LOG_LEVEL", value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, env = "LOG_FORMAT", value_enum, ignore_case = true, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Default cache entry TTL in seconds
    #[arg(
        long,
        env = "CACHE_TTL",
        default_value_t = DEFAULT_CACHE_TTL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_ttl: u64,

    /// Seconds between sweeps of expired cache entries
    #[arg(
        long,
        env = "CACHE_CHECK_PERIOD",
        default_value_t = DEFAULT_CACHE_CHECK_PERIOD_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_check_period: u64,

    /// Maximum number of cached entries
    #[arg(
        long,
        env = "CACHE_MAX_KEYS",
        default_value_t = DEFAULT_CACHE_MAX_KEYS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_max_keys: u64,

    /// IPInfo API token. The IPInfo provider is disabled without one.
    #[arg(long, env = "IPINFO_API_TOKEN", hide_env_values = true)]
    pub ipinfo_api_token: Option<String>,

    /// IPInfo API base URL
    #[arg(long, env = "IPINFO_BASE_URL", default_value = DEFAULT_IPINFO_BASE_URL)]
    pub ipinfo_base_url: String,

    /// Directory containing the GeoLite2 ASN, City and Country databases
    #[arg(long, env = "MAXMIND_DATA_DIR", value_parser, default_value = DEFAULT_MAXMIND_DATA_DIR)]
    pub maxmind_data_dir: PathBuf,

    /// Maximum number of addresses accepted per request
    #[arg(
        long,
        env = "MAX_IPS_PER_REQUEST",
        default_value_t = DEFAULT_MAX_IPS_PER_REQUEST,
        value_parser = clap::value_parser!(u64).range(1..=MAX_IPS_PER_REQUEST_LIMIT)
    )]
    pub max_ips_per_request: u64,

    /// Whole-request timeout in milliseconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..=REQUEST_TIMEOUT_MS_LIMIT)
    )]
    pub request_timeout_ms: u64,

    /// `max-age` advertised in the lookup response's Cache-Control header
    #[arg(
        long,
        env = "CACHE_CONTROL_MAX_AGE",
        default_value_t = DEFAULT_CACHE_CONTROL_MAX_AGE,
        value_parser = clap::value_parser!(u64).range(0..=CACHE_CONTROL_LIMIT_SECS)
    )]
    pub cache_control_max_age: u64,

    /// `stale-if-error` advertised in the lookup response's Cache-Control header
    #[arg(
        long,
        env = "CACHE_CONTROL_STALE_IF_ERROR",
        default_value_t = DEFAULT_CACHE_CONTROL_STALE_IF_ERROR,
        value_parser = clap::value_parser!(u64).range(0..=CACHE_CONTROL_LIMIT_SECS)
    )]
    pub cache_control_stale_if_error: u64,
}

impl Config {
    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validated cache construction options.
    pub fn cache_options(&self) -> Result<CacheOptions, CacheError> {
        CacheOptions::from_secs(
            self.cache_ttl,
            self.cache_check_period,
            self.cache_max_keys,
        )
    }

    /// Request-level limits for the batch boundary.
    pub fn batch_limits(&self) -> BatchLimits {
        BatchLimits {
            max_ips_per_request: usize::try_from(self.max_ips_per_request).unwrap_or(usize::MAX),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    /// Value of the `Cache-Control` header on lookup responses.
    pub fn cache_control_header(&self) -> String {
        format!(
            "public, max-age={}, stale-if-error={}",
            self.cache_control_max_age, self.cache_control_stale_if_error
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            cache_check_period: DEFAULT_CACHE_CHECK_PERIOD_SECS,
            cache_max_keys: DEFAULT_CACHE_MAX_KEYS,
            ipinfo_api_token: None,
            ipinfo_base_url: DEFAULT_IPINFO_BASE_URL.to_string(),
            maxmind_data_dir: PathBuf::from(DEFAULT_MAXMIND_DATA_DIR),
            max_ips_per_request: DEFAULT_MAX_IPS_PER_REQUEST,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_control_max_age: DEFAULT_CACHE_CONTROL_MAX_AGE,
            cache_control_stale_if_error: DEFAULT_CACHE_CONTROL_STALE_IF_ERROR,
        }
    }
}
