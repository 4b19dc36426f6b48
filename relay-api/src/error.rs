//! API error types.
//!
//! Every route error renders as `{"ok":false,"error":<message>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_gateway::ForwardError;
use serde::Serialize;
use thiserror::Error;

use crate::gate::AuthError;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller failed the token check. The cause is never disclosed.
    #[error("bad token")]
    Unauthorized(#[from] AuthError),

    /// Bad request / validation error
    #[error("{0}")]
    BadRequest(String),

    /// No such route
    #[error("not found")]
    NotFound,

    /// Request body over the accepted size
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The exchange could not be reached or timed out
    #[error("{0}")]
    BadGateway(String),

    /// Service unavailable
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code string used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::BadGateway(_) => "BAD_GATEWAY",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ForwardError> for ApiError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::InvalidInput(e) => Self::BadRequest(e.to_string()),
            e @ ForwardError::Upstream(_) => Self::BadGateway(e.to_string()),
            e @ ForwardError::NotConfigured => Self::ServiceUnavailable(e.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub ok: bool,
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::error::NetworkError;
    use relay_gateway::bitget::ValidationError;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::from(AuthError::Missing).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::PayloadTooLarge("x".to_string()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::BadRequest("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_errors_share_message() {
        assert_eq!(ApiError::from(AuthError::Missing).to_string(), "bad token");
        assert_eq!(ApiError::from(AuthError::Mismatch).to_string(), "bad token");
    }

    #[test]
    fn test_forward_error_mapping() {
        let err = ApiError::from(ForwardError::from(ValidationError::MissingField("size")));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "size is required");

        let err = ApiError::from(ForwardError::from(NetworkError::Timeout { timeout_ms: 5 }));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().starts_with("upstream request failed"));

        let err = ApiError::from(ForwardError::NotConfigured);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ErrorResponse::new("not found")).unwrap();
        assert_eq!(body, serde_json::json!({"ok": false, "error": "not found"}));
    }
}
