//! API route definitions.
//!
//! `/health` is public. Every exchange route sits behind the caller gate,
//! and any other path or method answers 404 in the API error format.

use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{Request, Response},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{Span, info, info_span};

use crate::error::ApiError;
use crate::handlers::{account, contracts, health, leverage, orders};
use crate::middleware::{RequestId, RequestIdLayer, auth_middleware};
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 512 * 1024;

/// Creates the router with all routes and the caller gate.
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .method_not_allowed_fallback(not_found);

    let protected_routes = Router::new()
        .route("/contracts", get(contracts::list_contracts))
        .route("/positions", get(account::single_position))
        .route("/auth", get(account::account_info))
        .route("/leverage", post(leverage::set_leverage))
        .route("/order", post(orders::place_order))
        .method_not_allowed_fallback(not_found)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Creates the router wrapped in access logging and request IDs.
pub fn create_app(state: Arc<AppState>) -> Router {
    let masker = state.masker.clone();

    let trace = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<Body>| {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map_or("", MatchedPath::as_str);
            let request_id = request
                .extensions()
                .get::<RequestId>()
                .map_or("", RequestId::as_str);
            let uri = request.uri().to_string();
            info_span!(
                "http_request",
                method = %request.method(),
                route,
                path = %request.uri().path(),
                uri = %masker.mask_uri(&uri),
                request_id,
            )
        })
        .on_request(())
        .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
            info!(
                status = response.status().as_u16(),
                elapsed_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                "Request completed"
            );
        });

    create_router(state).layer(trace).layer(RequestIdLayer::new())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
