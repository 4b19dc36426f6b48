//! # Relay Telemetry
//!
//! Logging for the relay gateway.
//!
//! This crate provides:
//! - Structured logging with JSON and pretty formats
//! - Sensitive data masking for tokens and exchange credentials

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Logging configuration and initialization
pub mod logging;

/// Sensitive data masking
pub mod masking;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::logging::{LogConfig, LogFormat, LoggingError, init_logging};
    pub use crate::masking::SensitiveDataMasker;
}
