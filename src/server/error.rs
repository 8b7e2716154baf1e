//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error_handling::LookupError;
use crate::utils::sanitize_and_truncate_error_message;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: bool,
    message: String,
    request_id: String,
}

/// Standard API error type.
///
/// Produces `{"error":true,"message":"...","requestId":"..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    request_id: String,
}

impl ApiError {
    /// A client error (400).
    pub fn bad_request(message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            request_id: request_id.into(),
        }
    }

    /// Classifies a lookup error: caller mistakes are 400, the rest 500.
    pub fn from_lookup(error: &LookupError, request_id: impl Into<String>) -> Self {
        let status = if error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: error.to_string(),
            request_id: request_id.into(),
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: true,
                message: sanitize_and_truncate_error_message(&self.message),
                request_id: self.request_id,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let err = LookupError::TooManyAddresses {
            max: 1,
            requested: 2,
        };
        assert_eq!(ApiError::from_lookup(&err, "id").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_map_to_internal() {
        let err = LookupError::RequestTimeout { timeout_ms: 5 };
        assert_eq!(
            ApiError::from_lookup(&err, "id").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
