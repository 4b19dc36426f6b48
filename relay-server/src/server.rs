//! Server lifecycle.

use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};

use relay_api::{ApiError, ApiServer};
use relay_core::error::{ConfigError, NetworkError};
use relay_gateway::bitget::BitgetForwarder;
use relay_telemetry::logging::{LoggingError, init_logging};

use crate::config::RelayConfig;

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialized
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// The exchange client could not be built
    #[error("failed to build exchange client: {0}")]
    Client(#[from] NetworkError),

    /// The HTTP server failed to bind or run
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The relay process: configuration in, HTTP server out.
#[derive(Debug)]
pub struct RelayServer {
    config: RelayConfig,
}

impl RelayServer {
    /// Creates a server from validated configuration.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Installs the global log subscriber from the logging section.
    pub fn init_logging(&self) -> Result<(), ServerError> {
        init_logging(&self.config.logging)?;
        Ok(())
    }

    /// Serves until `shutdown` resolves.
    ///
    /// Missing exchange credentials are not fatal: public routes keep working
    /// and signed routes answer 503.
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let RelayConfig {
            server, exchange, ..
        } = self.config;

        let missing = exchange.missing_credentials();
        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                "Exchange credentials incomplete; signed routes will answer 503"
            );
        }

        info!(
            base_url = %exchange.base_url,
            product_type = %exchange.product_type,
            timestamp_format = %exchange.timestamp_format,
            timeout_ms = exchange.timeout_ms,
            "Exchange client configured"
        );

        let forwarder = BitgetForwarder::from_config(exchange)?;
        ApiServer::new(server, forwarder)
            .run_with_shutdown(shutdown)
            .await?;

        info!("Relay server stopped");
        Ok(())
    }
}
