//! Application state for the API server.

use relay_gateway::bitget::BitgetForwarder;
use relay_telemetry::masking::SensitiveDataMasker;

use crate::gate::CallerGate;

/// Shared application state.
///
/// Immutable after startup; handlers reach it through `Arc<AppState>`.
#[derive(Debug)]
pub struct AppState {
    /// Caller token check for protected routes
    pub gate: CallerGate,
    /// Exchange forwarder
    pub forwarder: BitgetForwarder,
    /// Masker for request URIs written to access logs
    pub masker: SensitiveDataMasker,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(gate: CallerGate, forwarder: BitgetForwarder) -> Self {
        Self {
            gate,
            forwarder,
            masker: SensitiveDataMasker::new(),
        }
    }
}
