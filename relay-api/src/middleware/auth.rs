//! Caller token middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects requests that do not carry the configured caller token.
///
/// Runs before any handler, so a rejected request never reaches the exchange.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match state
        .gate
        .authenticate_request(request.headers(), request.uri().query())
    {
        Ok(()) => next.run(request).await,
        Err(reason) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %reason,
                "Rejected caller"
            );
            ApiError::from(reason).into_response()
        }
    }
}
