//! HTTP client initialization.

use crate::config::IPINFO_REQUEST_TIMEOUT;
use crate::error_handling::InitializationError;
use reqwest::ClientBuilder;

/// User-Agent sent on outbound provider requests.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Initializes the HTTP client used by remote providers.
///
/// Creates a `reqwest::Client` configured with:
/// - A per-request timeout of [`IPINFO_REQUEST_TIMEOUT`]
/// - A crate-identifying User-Agent header
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(IPINFO_REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}
