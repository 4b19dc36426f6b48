//! Network-related error types.
//!
//! Covers failures on the outbound leg to the exchange. An exchange answering
//! with a non-2xx status is not a network error: that response is relayed.

use thiserror::Error;

/// Network error type covering connection failures, timeouts and transport errors.
///
/// # Examples
///
/// ```
/// use relay_core::error::NetworkError;
///
/// let error = NetworkError::ConnectionFailed {
///     reason: "Connection refused".to_string(),
/// };
/// assert!(error.to_string().contains("Connection refused"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Connection to remote host failed.
    #[error("[Network] Connection failed: {reason}")]
    ConnectionFailed {
        /// Reason for the connection failure.
        reason: String,
    },

    /// Request timed out.
    #[error("[Network] Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The request could not be built (bad URL, bad header value).
    #[error("[Network] Invalid request: {reason}")]
    InvalidRequest {
        /// Reason the request was rejected locally.
        reason: String,
    },

    /// Transport failed after the connection was established.
    #[error("[Network] Transport error: {reason}")]
    Transport {
        /// Reason for the failure.
        reason: String,
    },
}
