//! IP lookup handler.

use axum::extract::{Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use log::{debug, error, warn};

use super::super::error::ApiError;
use super::super::types::{AppState, LookupResponse, RequestId};
use crate::lookup::lookup_batch;

/// `GET /ip-lookup?ip=a&ip=b`
///
/// Query pairs are taken as a sequence so `ip` may repeat.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let ips: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "ip")
        .map(|(_, value)| value)
        .collect();

    if ips.is_empty() {
        warn!("[{}] IP address missing in request", request_id);
        return Err(ApiError::bad_request("IP address is required", request_id));
    }
    debug!("[{}] Processing {} IP address(es)", request_id, ips.len());

    match lookup_batch(&state.service, &ips, state.limits).await {
        Ok(results) => {
            let failed = results.iter().filter(|r| r.error.is_some()).count();
            debug!(
                "[{}] Completed lookups: {} clean, {} with errors",
                request_id,
                results.len() - failed,
                failed
            );
            Ok((
                [(CACHE_CONTROL, state.cache_control.clone())],
                Json(LookupResponse { results }),
            )
                .into_response())
        }
        Err(e) => {
            if e.is_client_error() {
                warn!("[{}] Rejected lookup request: {}", request_id, e);
            } else {
                error!("[{}] Lookup request failed: {}", request_id, e);
            }
            Err(ApiError::from_lookup(&e, request_id))
        }
    }
}
