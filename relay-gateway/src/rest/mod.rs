//! REST client infrastructure.
//!
//! This module provides:
//! - Request signing (HMAC-SHA256, base64)
//! - A single-attempt client with an explicit timeout
//! - Transparent capture of upstream status and body
//!
//! # Example
//!
//! ```ignore
//! use relay_gateway::rest::{RestClient, RestConfig};
//!
//! let config = RestConfig::builder()
//!     .api_key("your_api_key")
//!     .api_secret("your_api_secret")
//!     .passphrase("your_passphrase")
//!     .build();
//!
//! let client = RestClient::new(config)?;
//! let response = client.get("/api/mix/v1/account/accounts")
//!     .query("productType", "umcbl")
//!     .signed()
//!     .send()
//!     .await?;
//! ```

mod client;
mod config;
mod signer;

pub use client::{RelayedResponse, RequestBuilder, RestClient};
pub use config::{DEFAULT_BASE_URL, DEFAULT_PRODUCT_TYPE, RestConfig, RestConfigBuilder};
pub use signer::{
    ACCESS_KEY, ACCESS_PASSPHRASE, ACCESS_SIGN, ACCESS_TIMESTAMP, AuthHeaders, Clock,
    JSON_CONTENT_TYPE, QueryString, RequestSigner, SignedRequest,
};
