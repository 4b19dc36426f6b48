//! Leverage handler.

use axum::extract::{State, rejection::BytesRejection};
use bytes::Bytes;
use relay_gateway::ForwardError;
use relay_gateway::bitget::{LeverageInput, parse_body};
use std::sync::Arc;

use super::body_or_rejection;
use crate::error::ApiResult;
use crate::response::Relayed;
use crate::state::AppState;

/// Sets leverage for a symbol.
///
/// POST /leverage
pub async fn set_leverage(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Relayed> {
    let body = body_or_rejection(body)?;
    let input: LeverageInput = parse_body(&body).map_err(ForwardError::from)?;
    Ok(state.forwarder.set_leverage(input).await?.into())
}
