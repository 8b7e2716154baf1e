//! Cache options and statistics.

use serde::Serialize;
use std::time::Duration;

use crate::config::{DEFAULT_CACHE_CHECK_PERIOD_SECS, DEFAULT_CACHE_MAX_KEYS, DEFAULT_CACHE_TTL_SECS};
use crate::error_handling::{CacheError, LastError};

/// Construction options for a cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Default time-to-live applied when `set` is called without one.
    pub ttl: Duration,
    /// Interval between background sweeps of expired entries.
    pub check_period: Duration,
    /// Hard cap on the number of live keys.
    pub max_keys: u64,
}

impl CacheOptions {
    /// Builds options from whole seconds, validating them.
    pub fn from_secs(
        ttl_secs: u64,
        check_period_secs: u64,
        max_keys: u64,
    ) -> Result<Self, CacheError> {
        let options = Self {
            ttl: Duration::from_secs(ttl_secs),
            check_period: Duration::from_secs(check_period_secs),
            max_keys,
        };
        options.validate()?;
        Ok(options)
    }

    /// Checks that every option is positive.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidConfig { field: "TTL" });
        }
        if self.check_period.is_zero() {
            return Err(CacheError::InvalidConfig {
                field: "check period",
            });
        }
        if self.max_keys == 0 {
            return Err(CacheError::InvalidConfig { field: "max keys" });
        }
        Ok(())
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            check_period: Duration::from_secs(DEFAULT_CACHE_CHECK_PERIOD_SECS),
            max_keys: DEFAULT_CACHE_MAX_KEYS,
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Reads that found a live entry.
    pub hits: u64,
    /// Reads that found nothing.
    pub misses: u64,
    /// Live entries at snapshot time.
    pub keys: u64,
    /// Most recent store fault.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<LastError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = CacheOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.ttl, Duration::from_secs(3600));
        assert_eq!(options.check_period, Duration::from_secs(600));
        assert_eq!(options.max_keys, 10_000);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert_eq!(
            CacheOptions::from_secs(0, 600, 10),
            Err(CacheError::InvalidConfig { field: "TTL" })
        );
    }

    #[test]
    fn test_zero_check_period_rejected() {
        assert_eq!(
            CacheOptions::from_secs(60, 0, 10),
            Err(CacheError::InvalidConfig {
                field: "check period"
            })
        );
    }

    #[test]
    fn test_zero_max_keys_rejected() {
        assert_eq!(
            CacheOptions::from_secs(60, 60, 0),
            Err(CacheError::InvalidConfig { field: "max keys" })
        );
    }

    #[test]
    fn test_stats_serialization_omits_missing_error() {
        let stats = CacheStats {
            hits: 1,
            misses: 2,
            keys: 3,
            last_error: None,
        };
        let json = serde_json::to_value(&stats).expect("stats serialize");
        assert_eq!(json, serde_json::json!({"hits": 1, "misses": 2, "keys": 3}));
    }
}
