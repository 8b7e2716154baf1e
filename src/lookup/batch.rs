//! Batch lookups with a whole-request deadline.

use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::{IpLookupResult, IpLookupService};
use crate::config::{DEFAULT_MAX_IPS_PER_REQUEST, DEFAULT_REQUEST_TIMEOUT_MS};
use crate::error_handling::LookupError;
use crate::validation::is_valid_ip;

/// Request-level constraints applied to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// Largest accepted batch.
    pub max_ips_per_request: usize,
    /// Wall-clock budget for the whole batch.
    pub request_timeout: Duration,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_ips_per_request: DEFAULT_MAX_IPS_PER_REQUEST as usize,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

/// Looks up every address in `ips` concurrently.
///
/// The batch is rejected before any provider is called if it is empty, too
/// large, or contains a malformed address. An address whose lookup fails is
/// returned as an entry with empty `providers` and an `error`, so the output
/// has one entry per input address, in input order.
///
/// The deadline is all-or-nothing: if it elapses, the whole call fails with
/// [`LookupError::RequestTimeout`]. Lookups still in flight are detached and
/// run to completion in the background; their results are dropped.
pub async fn lookup_batch(
    service: &Arc<IpLookupService>,
    ips: &[String],
    limits: BatchLimits,
) -> Result<Vec<IpLookupResult>, LookupError> {
    validate_batch(ips, limits.max_ips_per_request)?;

    let handles: Vec<_> = ips
        .iter()
        .map(|ip| {
            let service = Arc::clone(service);
            let task_ip = ip.clone();
            let handle = tokio::spawn(async move { service.lookup(&task_ip).await });
            (ip.clone(), handle)
        })
        .collect();

    let settled = join_all(
        handles
            .into_iter()
            .map(|(ip, handle)| async move { (ip, handle.await) }),
    );

    let timeout_ms = u64::try_from(limits.request_timeout.as_millis()).unwrap_or(u64::MAX);
    let Ok(outcomes) = timeout(limits.request_timeout, settled).await else {
        warn!(
            "Batch of {} addresses timed out after {}ms",
            ips.len(),
            timeout_ms
        );
        return Err(LookupError::RequestTimeout { timeout_ms });
    };

    let results = outcomes
        .into_iter()
        .map(|(ip, joined)| match joined {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => IpLookupResult::failed(ip, e.to_string()),
            Err(e) => IpLookupResult::failed(ip, format!("Lookup task failed: {}", e)),
        })
        .collect();

    debug!("Batch of {} addresses complete", ips.len());
    Ok(results)
}

fn validate_batch(ips: &[String], max: usize) -> Result<(), LookupError> {
    if ips.is_empty() {
        return Err(LookupError::InvalidInput(
            "At least one IP address is required".to_string(),
        ));
    }
    if ips.len() > max {
        return Err(LookupError::TooManyAddresses {
            max,
            requested: ips.len(),
        });
    }

    let invalid: Vec<&str> = ips
        .iter()
        .map(String::as_str)
        .filter(|ip| !is_valid_ip(ip))
        .collect();
    if !invalid.is_empty() {
        return Err(LookupError::InvalidInput(format!(
            "Invalid IP addresses found: {}",
            invalid.join(", ")
        )));
    }
    Ok(())
}
