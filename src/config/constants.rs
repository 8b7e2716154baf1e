//! Configuration constants.
//!
//! This module defines the defaults and limits used throughout the service.
//! Command-line defaults in [`super::Config`] are taken from here.

use std::time::Duration;

// Server
/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

// Cache
/// Default cache entry TTL in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
/// Default interval between expired-entry sweeps in seconds
pub const DEFAULT_CACHE_CHECK_PERIOD_SECS: u64 = 600;
/// Default cap on live cache keys
pub const DEFAULT_CACHE_MAX_KEYS: u64 = 10_000;

// Request limits
/// Default number of addresses accepted in one request
pub const DEFAULT_MAX_IPS_PER_REQUEST: u64 = 100;
/// Upper bound accepted for `MAX_IPS_PER_REQUEST`
pub const MAX_IPS_PER_REQUEST_LIMIT: u64 = 1000;
/// Default whole-batch timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Upper bound accepted for `REQUEST_TIMEOUT_MS`
pub const REQUEST_TIMEOUT_MS_LIMIT: u64 = 60_000;

// HTTP caching headers
/// Default `max-age` advertised on lookup responses, in seconds
pub const DEFAULT_CACHE_CONTROL_MAX_AGE: u64 = 3600;
/// Default `stale-if-error` advertised on lookup responses, in seconds
pub const DEFAULT_CACHE_CONTROL_STALE_IF_ERROR: u64 = 600;
/// Upper bound for both `Cache-Control` directives (1 day)
pub const CACHE_CONTROL_LIMIT_SECS: u64 = 86_400;

// Providers
/// IPInfo API base URL
pub const DEFAULT_IPINFO_BASE_URL: &str = "https://ipinfo.io";
/// Per-request timeout for IPInfo API calls
pub const IPINFO_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Address used to probe the IPInfo API at startup
pub const IPINFO_PROBE_IP: &str = "8.8.8.8";
/// Directory holding the MaxMind GeoLite2 databases
pub const DEFAULT_MAXMIND_DATA_DIR: &str = "./data";
/// MaxMind ASN database file name
pub const MAXMIND_ASN_DB: &str = "GeoLite2-ASN.mmdb";
/// MaxMind City database file name
pub const MAXMIND_CITY_DB: &str = "GeoLite2-City.mmdb";
/// MaxMind Country database file name
pub const MAXMIND_COUNTRY_DB: &str = "GeoLite2-Country.mmdb";

// Error message limits
/// Maximum error message length in characters (2000 chars)
/// Error messages longer than this are truncated with a note about the original length
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;
