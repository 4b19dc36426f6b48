//! # Relay Gateway
//!
//! Outbound side of the relay: signing and forwarding to the exchange.
//!
//! This crate provides:
//! - REST client with request signing and a bounded timeout
//! - Normalization of simplified caller commands into exchange payloads
//! - The Bitget mix v1 forwarder used by the HTTP routes
//!
//! # Architecture
//!
//! - `rest` - signer, client configuration and the REST client
//! - `bitget` - wire types, normalizer and forwarder
//! - `error` - forwarding errors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

/// REST client infrastructure
pub mod rest;

/// Bitget exchange adapter
pub mod bitget;

/// Forwarding errors
pub mod error;

pub use error::ForwardError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bitget::{BitgetForwarder, LeverageInput, OrderInput, PositionQuery, ProductQuery};
    pub use crate::error::ForwardError;
    pub use crate::rest::{RelayedResponse, RequestSigner, RestClient, RestConfig};
}
