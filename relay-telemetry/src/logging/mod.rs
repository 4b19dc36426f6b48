//! Structured logging for the relay.
//!
//! Provides configurable logging with support for:
//! - JSON and pretty-print formats
//! - `RUST_LOG` style filter directives

mod config;

pub use config::{LogConfig, LogFormat};

use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

/// Initialize the logging system with the given configuration.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
///
/// # Example
///
/// ```no_run
/// use relay_telemetry::logging::{init_logging, LogConfig};
///
/// init_logging(&LogConfig::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LoggingError::InvalidConfig(e.to_string()))?,
    };

    let layers: Vec<Box<dyn Layer<_> + Send + Sync>> = vec![create_stdout_layer(config)];

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}

fn create_stdout_layer<S>(config: &LogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let base_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(config.include_thread_id)
        .with_file(config.include_file_info)
        .with_line_number(config.include_file_info);

    match config.format {
        LogFormat::Json => Box::new(base_layer.json().flatten_event(true)),
        LogFormat::Pretty => Box::new(base_layer),
    }
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    /// Invalid configuration
    #[error("Invalid logging configuration: {0}")]
    InvalidConfig(String),
}
