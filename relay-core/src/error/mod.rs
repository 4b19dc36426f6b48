//! Error types shared across the relay crates.
//!
//! - [`ConfigError`] - configuration loading and validation failures
//! - [`NetworkError`] - transport failures talking to the exchange

mod config;
mod network;

pub use config::ConfigError;
pub use network::NetworkError;
