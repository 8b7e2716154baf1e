//! Error handling.
//!
//! This module provides the error types for each component boundary:
//! - Initialization errors (logger, HTTP client)
//! - Provider errors and the engine's per-provider failure record
//! - Lookup errors surfaced to callers of the engine and the batch boundary
//! - Cache errors
//! - Timestamped "last error" records for metrics reporting
//!
//! Lookup errors are split into client errors (bad input, oversized batch) and
//! everything else; see [`LookupError::is_client_error`].

mod record;
mod types;

// Re-export public API
pub use record::{LastError, LastErrorSlot};
pub use types::{CacheError, InitializationError, LookupError, ProviderError, ProviderFailure};

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(provider: &str, source: ProviderError) -> ProviderFailure {
        ProviderFailure {
            provider: provider.to_string(),
            ip: "8.8.8.8".to_string(),
            source,
        }
    }

    #[test]
    fn test_provider_failure_names_provider_and_ip() {
        let f = failure("IPInfo", ProviderError::Request("status 503".into()));
        assert_eq!(
            f.to_string(),
            "Provider IPInfo lookup failed for 8.8.8.8: status 503"
        );
    }

    #[test]
    fn test_all_providers_failed_lists_failures() {
        let err = LookupError::AllProvidersFailed {
            ip: "8.8.8.8".to_string(),
            failures: vec![
                failure("MaxMind", ProviderError::NoData("8.8.8.8".into())),
                failure("IPInfo", ProviderError::EmptyResult),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("All providers failed to lookup IP 8.8.8.8 ("));
        assert!(msg.contains("Provider MaxMind lookup failed"));
        assert!(msg.contains("; Provider IPInfo lookup failed"));
    }

    #[test]
    fn test_all_providers_failed_without_failures() {
        let err = LookupError::AllProvidersFailed {
            ip: "1.1.1.1".to_string(),
            failures: Vec::new(),
        };
        assert_eq!(err.to_string(), "All providers failed to lookup IP 1.1.1.1");
    }

    #[test]
    fn test_timeout_message_embeds_millis() {
        let err = LookupError::RequestTimeout { timeout_ms: 250 };
        assert_eq!(err.to_string(), "Request timeout after 250ms");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(LookupError::InvalidInput("IP address is required".into()).is_client_error());
        assert!(LookupError::TooManyAddresses {
            max: 3,
            requested: 4
        }
        .is_client_error());
        assert!(!LookupError::ProvidersUnavailable.is_client_error());
        assert!(!LookupError::RequestTimeout { timeout_ms: 1 }.is_client_error());
    }

    #[test]
    fn test_last_error_slot_keeps_latest() {
        let slot = LastErrorSlot::default();
        assert!(slot.get().is_none());
        slot.record("first");
        slot.record("second\x00");
        let last = slot.get().expect("record should be stored");
        assert_eq!(last.message, "second");
    }

    #[test]
    fn test_cache_error_messages() {
        assert_eq!(
            CacheError::InvalidConfig { field: "TTL" }.to_string(),
            "Cache TTL must be a positive integer"
        );
        assert_eq!(
            CacheError::CapacityExceeded { max_keys: 2 }.to_string(),
            "Cache max keys amount exceeded (2)"
        );
    }
}
