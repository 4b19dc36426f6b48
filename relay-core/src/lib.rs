//! # Relay Core
//!
//! Shared building blocks for the relay gateway crates.
//!
//! This crate provides:
//! - Error types for configuration and network failures
//! - Configuration loading with YAML/TOML/JSON support and environment overrides
//! - Exchange credentials and timestamp formats shared by the signer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]

/// Core type definitions
pub mod types;

/// Error types
pub mod error;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::types::*;
}
