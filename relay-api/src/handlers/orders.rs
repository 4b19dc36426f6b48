//! Order handlers.

use axum::extract::{State, rejection::BytesRejection};
use bytes::Bytes;
use relay_gateway::ForwardError;
use relay_gateway::bitget::{OrderInput, parse_body};
use std::sync::Arc;

use super::body_or_rejection;
use crate::error::ApiResult;
use crate::response::Relayed;
use crate::state::AppState;

/// Places an order.
///
/// POST /order
///
/// The body is read as raw bytes so malformed JSON is reported in the API
/// error format rather than by an extractor rejection.
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Relayed> {
    let body = body_or_rejection(body)?;
    let input: OrderInput = parse_body(&body).map_err(ForwardError::from)?;
    Ok(state.forwarder.place_order(input).await?.into())
}
