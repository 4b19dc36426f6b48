//! Public market data handlers.

use axum::extract::{Query, State, rejection::QueryRejection};
use relay_gateway::bitget::ProductQuery;
use std::sync::Arc;

use super::query_or_bad_request;
use crate::error::ApiResult;
use crate::response::Relayed;
use crate::state::AppState;

/// Lists contracts for a product type.
///
/// GET /contracts?product=<productType>
pub async fn list_contracts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Relayed> {
    let query = query_or_bad_request(query)?;
    Ok(state.forwarder.contracts(query).await?.into())
}
