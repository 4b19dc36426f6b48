//! Bitget mix v1 adapter.
//!
//! - `types` - wire enums, endpoint paths and the response envelope
//! - `normalize` - validation and coercion of caller commands
//! - `forwarder` - signed relay of the gateway routes
//!
//! # Example
//!
//! ```ignore
//! use relay_gateway::bitget::{BitgetForwarder, OrderInput};
//! use relay_gateway::rest::RestConfig;
//!
//! let forwarder = BitgetForwarder::from_config(RestConfig::default())?;
//! let relayed = forwarder.place_order(input).await?;
//! ```

mod forwarder;
mod normalize;
mod types;

pub use forwarder::{BitgetForwarder, ExchangeCall};
pub use normalize::{
    ClientOidSource, LeverageInput, LooseValue, NormalizedLeverage, NormalizedOrder, OrderInput,
    PositionQuery, ProductQuery, ValidationError, normalize_leverage, normalize_order, parse_body,
};
pub use types::*;
