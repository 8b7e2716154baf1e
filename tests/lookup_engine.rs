//! End-to-end tests for the lookup engine through the public API.

mod helpers;

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use helpers::{service_with, ScriptedProvider};
use ip_lookup::lookup::{lookup_batch, BatchLimits};
use ip_lookup::{IpLookupProvider, LookupError, ProviderError};

fn ips(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_results_merge_across_providers() {
    let geo = ScriptedProvider::ok("Geo", json!({"country": "US"}));
    let asn = ScriptedProvider::ok("Asn", json!({"asn": 15169}));
    let service = service_with(vec![
        geo.clone() as Arc<dyn IpLookupProvider>,
        asn.clone() as Arc<dyn IpLookupProvider>,
    ])
    .await;

    let result = service.lookup("8.8.8.8").await.expect("lookup succeeds");
    assert_eq!(result.ip, "8.8.8.8");
    assert_eq!(result.providers["geo"]["country"], "US");
    assert_eq!(result.providers["asn"]["asn"], 15169);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_repeat_lookup_served_from_cache() {
    let geo = ScriptedProvider::ok("Geo", json!({"country": "US"}));
    let service = service_with(vec![geo.clone() as Arc<dyn IpLookupProvider>]).await;

    service.lookup("1.1.1.1").await.expect("first lookup");
    service.lookup("1.1.1.1").await.expect("second lookup");

    assert_eq!(geo.calls(), 1);
    let metrics = service.get_metrics().await;
    assert_eq!(metrics.total_requests, 2);
    assert_eq!(metrics.cache.hits, 1);
    assert_eq!(metrics.cache.misses, 1);
}

#[tokio::test]
async fn test_partial_failure_keeps_successful_data() {
    let geo = ScriptedProvider::ok("Geo", json!({"country": "DE"}));
    let broken = ScriptedProvider::failing("Broken", ProviderError::Request("HTTP 503".into()));
    let service = service_with(vec![
        geo as Arc<dyn IpLookupProvider>,
        broken as Arc<dyn IpLookupProvider>,
    ])
    .await;

    let result = service.lookup("9.9.9.9").await.expect("partial success");
    assert_eq!(result.providers.len(), 1);
    let error = result.error.expect("failure summarised");
    assert!(error.contains("Broken"));
    assert!(error.contains("HTTP 503"));
}

#[tokio::test]
async fn test_all_providers_failing_counts_as_error() {
    let broken = ScriptedProvider::failing("Broken", ProviderError::NoData("9.9.9.9".into()));
    let service = service_with(vec![broken as Arc<dyn IpLookupProvider>]).await;

    let err = service.lookup("9.9.9.9").await.expect_err("no data");
    assert!(matches!(err, LookupError::AllProvidersFailed { .. }));

    let metrics = service.get_metrics().await;
    assert_eq!(metrics.errors, 1);
    let last = metrics.last_error.expect("last error recorded");
    assert!(last.message.contains("All providers failed"));
}

#[tokio::test]
async fn test_batch_mixes_success_and_failure_in_order() {
    let geo = ScriptedProvider::ok("Geo", json!({"country": "US"}));
    let service = service_with(vec![geo as Arc<dyn IpLookupProvider>]).await;

    let results = lookup_batch(
        &service,
        &ips(&["8.8.8.8", "2001:4860:4860::8888", "10.0.0.1"]),
        BatchLimits::default(),
    )
    .await
    .expect("batch succeeds");

    let order: Vec<&str> = results.iter().map(|r| r.ip.as_str()).collect();
    assert_eq!(order, vec!["8.8.8.8", "2001:4860:4860::8888", "10.0.0.1"]);
}

#[tokio::test]
async fn test_batch_validation_happens_before_lookups() {
    let geo = ScriptedProvider::ok("Geo", json!({}));
    let service = service_with(vec![geo.clone() as Arc<dyn IpLookupProvider>]).await;

    let err = lookup_batch(&service, &ips(&["8.8.8.8", "999.1.1.1"]), BatchLimits::default())
        .await
        .expect_err("invalid address rejected");
    assert_eq!(err.to_string(), "Invalid IP addresses found: 999.1.1.1");
    assert_eq!(geo.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_exceeds_request_deadline() {
    let slow = ScriptedProvider::slow("Slow", json!({}), Duration::from_secs(10));
    let service = service_with(vec![slow as Arc<dyn IpLookupProvider>]).await;

    let limits = BatchLimits {
        max_ips_per_request: 5,
        request_timeout: Duration::from_secs(1),
    };
    let err = lookup_batch(&service, &ips(&["8.8.8.8"]), limits)
        .await
        .expect_err("deadline elapses");
    assert_eq!(err.to_string(), "Request timeout after 1000ms");
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_within_deadline_succeeds() {
    let slow = ScriptedProvider::slow("Slow", json!({"ok": true}), Duration::from_millis(200));
    let service = service_with(vec![slow as Arc<dyn IpLookupProvider>]).await;

    let limits = BatchLimits {
        max_ips_per_request: 5,
        request_timeout: Duration::from_secs(1),
    };
    let results = lookup_batch(&service, &ips(&["8.8.8.8", "8.8.4.4"]), limits)
        .await
        .expect("completes in time");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.providers["slow"]["ok"] == true));
}
