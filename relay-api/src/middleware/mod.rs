//! API middleware components.
//!
//! - caller token check for protected routes
//! - request ID propagation

pub mod auth;
mod request_id;

pub use auth::auth_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
