//! API server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use relay_gateway::bitget::BitgetForwarder;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::gate::CallerGate;
use crate::routes::create_app;
use crate::state::AppState;

/// API server.
#[derive(Debug)]
pub struct ApiServer {
    /// Server configuration, minus the caller token moved into the gate
    config: ApiConfig,
    /// Application state
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server. The caller token moves into the gate.
    #[must_use]
    pub fn new(mut config: ApiConfig, forwarder: BitgetForwarder) -> Self {
        let gate = CallerGate::new(config.caller_token.take());
        if !gate.is_configured() {
            warn!("No caller token configured; every protected route will answer 401");
        }
        let state = Arc::new(AppState::new(gate, forwarder));
        Self { config, state }
    }

    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn bind(&self) -> Result<TcpListener, ApiError> {
        let addr = self.config.bind_address();
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ApiError::Internal(format!("Invalid bind address {addr}: {e}")))?;

        TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to bind to {addr}: {e}")))
    }

    /// Serves until `shutdown_signal` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or run.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while running.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let app = create_app(self.state);

        match listener.local_addr() {
            Ok(addr) => info!(%addr, "API server listening"),
            Err(_) => info!(addr = %self.config.bind_address(), "API server listening"),
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

        warn!("API server shutting down");

        Ok(())
    }
}
