//! Account and position handlers.

use axum::extract::{Query, State, rejection::QueryRejection};
use relay_gateway::bitget::{PositionQuery, ProductQuery};
use std::sync::Arc;

use super::query_or_bad_request;
use crate::error::ApiResult;
use crate::response::Relayed;
use crate::state::AppState;

/// Returns the position for a symbol and margin coin.
///
/// GET /positions?symbol=<symbol>&marginCoin=<coin>
pub async fn single_position(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PositionQuery>, QueryRejection>,
) -> ApiResult<Relayed> {
    let query = query_or_bad_request(query)?;
    Ok(state.forwarder.single_position(query).await?.into())
}

/// Returns the account list for a product type.
///
/// GET /auth?product=<productType>
pub async fn account_info(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Relayed> {
    let query = query_or_bad_request(query)?;
    Ok(state.forwarder.accounts(query).await?.into())
}
