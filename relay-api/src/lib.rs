//! # Relay API
//!
//! Inbound HTTP surface of the relay gateway.
//!
//! This crate provides:
//! - Shared-token caller gate in front of every exchange route
//! - Routes relaying Bitget responses unmodified
//! - A single error type rendering `{"ok":false,"error":...}`
//! - Request IDs and masked access logs
//!
//! # Routes
//!
//! - `GET /health` - liveness, no token
//! - `GET /contracts` - contract list (public exchange data)
//! - `GET /positions` - single position
//! - `GET /auth` - account list
//! - `POST /leverage` - set leverage
//! - `POST /order` - place order
//!
//! # Authentication
//!
//! The caller token is accepted, in priority order, from:
//! - Header: `x-fwd-token: <token>`
//! - Header: `Authorization: Bearer <token>`
//! - Query parameter: `?token=<token>`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use gate::{AuthError, CallerGate};
pub use routes::{create_app, create_router};
pub use server::ApiServer;
pub use state::AppState;
