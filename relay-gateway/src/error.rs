//! Forwarding errors.

use relay_core::error::NetworkError;
use thiserror::Error;

use crate::bitget::ValidationError;

/// Failure of one forwarded call.
///
/// An exchange answering with a non-2xx status is not a `ForwardError`; that
/// response is relayed as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    /// The caller's payload was rejected before any network activity.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// Transport failure or timeout on the outbound leg.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] NetworkError),

    /// A signed route was called but no exchange credentials are loaded.
    #[error("exchange credentials are not configured")]
    NotConfigured,
}
