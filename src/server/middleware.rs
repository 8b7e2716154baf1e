//! Request correlation and timing middleware.

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

use super::types::RequestId;
use crate::utils::duration_to_ms;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
/// Header carrying the handler duration.
pub const RESPONSE_TIME_HEADER: HeaderName = HeaderName::from_static("x-response-time");

/// Tags each request with an id, logs it, and stamps timing headers.
///
/// A well-formed incoming `X-Request-Id` is reused; otherwise a UUID v4 is
/// generated. The id is exposed to handlers as an `Extension<RequestId>`.
pub async fn request_context(mut request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    info!("[{}] --> {} {}", request_id, method, path);

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    let elapsed = duration_to_ms(started.elapsed());
    let status = response.status();
    if status.is_server_error() {
        warn!("[{}] <-- {} {} {} in {}", request_id, method, path, status.as_u16(), elapsed);
    } else {
        info!("[{}] <-- {} {} {} in {}", request_id, method, path, status.as_u16(), elapsed);
    }

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        headers.insert(RESPONSE_TIME_HEADER, value);
    }
    response
}
