//! # Relay Server
//!
//! Process entry point for the relay gateway.
//!
//! This crate provides:
//! - Configuration loading from file, environment and command line
//! - Logging initialization
//! - Server startup and graceful shutdown

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod server;
pub mod shutdown;

pub use config::RelayConfig;
pub use server::{RelayServer, ServerError};
pub use shutdown::shutdown_signal;
