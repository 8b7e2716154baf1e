//! Remote IPInfo API provider.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::IPINFO_PROBE_IP;
use crate::error_handling::ProviderError;
use crate::lookup::{IpLookupProvider, ProviderResponse};
use crate::utils::sanitize_and_truncate_error_message;
use crate::validation::is_valid_ip;

/// Registered provider name.
pub const IPINFO_PROVIDER_NAME: &str = "IPInfo";

/// IPInfo API response document.
///
/// Only `ip` is required. Fields this crate does not model are kept in
/// `extra` so the payload passes through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpInfoResponse {
    /// Address the document describes.
    pub ip: String,
    /// City name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Region or state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// ISO country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// `latitude,longitude` pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,
    /// `AS<number> <organisation>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal: Option<String>,
    /// IANA time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Provider backed by the IPInfo REST API.
///
/// Available only when an API token is configured.
pub struct IpInfoProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl IpInfoProvider {
    /// Creates a provider. An empty token counts as no token.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    async fn fetch(&self, ip: &str, token: &str) -> Result<IpInfoResponse, ProviderError> {
        let url = format!("{}/{}", self.base_url, ip);
        debug!("Making IPInfo API request for {}", ip);

        let response = self
            .client
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| request_error(None, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Request(format!(
                "IPInfo API request failed ({}): unexpected status",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| request_error(Some(status.as_u16()), e))?;

        serde_json::from_value::<IpInfoResponse>(body).map_err(|e| {
            warn!("Invalid response from IPInfo API for {}: {}", ip, e);
            ProviderError::Request("Invalid response from IPInfo API".to_string())
        })
    }
}

/// Builds a request error without leaking the token-bearing URL.
fn request_error(status: Option<u16>, error: reqwest::Error) -> ProviderError {
    let status = status
        .or_else(|| error.status().map(|s| s.as_u16()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let message = sanitize_and_truncate_error_message(&error.without_url().to_string());
    ProviderError::Request(format!("IPInfo API request failed ({}): {}", status, message))
}

#[async_trait]
impl IpLookupProvider for IpInfoProvider {
    fn name(&self) -> &str {
        IPINFO_PROVIDER_NAME
    }

    async fn initialise(&self) -> Result<(), ProviderError> {
        let Some(token) = self.token.as_deref() else {
            info!("IPInfo provider initialization skipped - no token available");
            return Ok(());
        };

        self.fetch(IPINFO_PROBE_IP, token)
            .await
            .map_err(|e| ProviderError::Init(format!("Failed to initialise IPInfo provider: {}", e)))?;
        info!("IPInfo provider initialised successfully");
        Ok(())
    }

    async fn is_available(&self) -> bool {
        self.token.is_some()
    }

    async fn lookup(&self, ip: &str) -> Result<Option<ProviderResponse>, ProviderError> {
        if ip.is_empty() {
            return Err(ProviderError::MissingAddress);
        }
        if !is_valid_ip(ip) {
            return Err(ProviderError::InvalidAddress(ip.to_string()));
        }
        let token = self.token.as_deref().ok_or_else(|| {
            ProviderError::Unavailable("IPInfo provider not available - no token configured".to_string())
        })?;

        let document = self.fetch(ip, token).await?;
        debug!(
            "IPInfo lookup for {}: location={}, org={}",
            ip,
            document.loc.is_some(),
            document.org.is_some()
        );

        let response_ip = document.ip.clone();
        let payload = serde_json::to_value(&document)
            .map_err(|e| ProviderError::Request(format!("Failed to encode IPInfo response: {}", e)))?;
        Ok(Some(ProviderResponse::new(response_ip, payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    const GOOD_TOKEN: &str = "good-token";

    async fn fake_ipinfo(
        Path(ip): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        if params.get("token").map(String::as_str) != Some(GOOD_TOKEN) {
            return Err(StatusCode::UNAUTHORIZED);
        }
        if ip == "9.9.9.9" {
            return Ok(Json(json!({"city": "Berkeley"})));
        }
        Ok(Json(json!({
            "ip": ip,
            "city": "Mountain View",
            "country": "US",
            "loc": "37.4056,-122.0775",
            "org": "AS15169 Google LLC",
            "anycast": true
        })))
    }

    /// Starts a local stand-in for the IPInfo API and returns its base URL.
    async fn spawn_fake_api() -> String {
        let app = Router::new().route("/{ip}", get(fake_ipinfo));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn provider(base_url: &str, token: Option<&str>) -> IpInfoProvider {
        IpInfoProvider::new(
            reqwest::Client::new(),
            base_url,
            token.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_unavailable_without_token() {
        let provider = provider("http://127.0.0.1:9", None);
        assert!(!provider.is_available().await);
        // Initialisation is skipped rather than failed
        assert!(provider.initialise().await.is_ok());
        assert!(matches!(
            provider.lookup("8.8.8.8").await,
            Err(ProviderError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_missing() {
        let provider = provider("http://127.0.0.1:9", Some(""));
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn test_lookup_returns_document() {
        let base_url = spawn_fake_api().await;
        let provider = provider(&base_url, Some(GOOD_TOKEN));

        assert!(provider.initialise().await.is_ok());
        let response = provider
            .lookup("8.8.8.8")
            .await
            .expect("lookup succeeds")
            .expect("response present");
        assert_eq!(response.ip, "8.8.8.8");
        assert_eq!(response.data["country"], "US");
        assert_eq!(response.data["org"], "AS15169 Google LLC");
        // Unmodelled fields pass through
        assert_eq!(response.data["anycast"], true);
    }

    #[tokio::test]
    async fn test_initialise_fails_with_bad_token() {
        let base_url = spawn_fake_api().await;
        let provider = provider(&base_url, Some("wrong"));

        match provider.initialise().await {
            Err(ProviderError::Init(msg)) => {
                assert!(msg.contains("401"));
                assert!(!msg.contains("wrong"));
            }
            other => panic!("expected Init error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_response_without_ip_is_rejected() {
        let base_url = spawn_fake_api().await;
        let provider = provider(&base_url, Some(GOOD_TOKEN));

        assert_eq!(
            provider.lookup("9.9.9.9").await,
            Err(ProviderError::Request(
                "Invalid response from IPInfo API".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_token() {
        // Nothing listens on the discard port
        let provider = provider("http://127.0.0.1:9", Some("s3cr3t"));
        match provider.lookup("8.8.8.8").await {
            Err(ProviderError::Request(msg)) => {
                assert!(msg.starts_with("IPInfo API request failed (unknown)"));
                assert!(!msg.contains("s3cr3t"));
            }
            other => panic!("expected Request error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lookup_rejects_malformed_address() {
        let provider = provider("http://127.0.0.1:9", Some(GOOD_TOKEN));
        assert_eq!(
            provider.lookup("not-an-ip").await,
            Err(ProviderError::InvalidAddress("not-an-ip".to_string()))
        );
        assert_eq!(provider.lookup("").await, Err(ProviderError::MissingAddress));
    }
}
