//! API request handlers.
//!
//! Each exchange route validates its input, forwards one call and relays the
//! exchange response unmodified.

pub mod account;
pub mod contracts;
pub mod health;
pub mod leverage;
pub mod orders;

use axum::extract::{
    Query,
    rejection::{BytesRejection, QueryRejection},
};
use axum::http::StatusCode;
use bytes::Bytes;

use crate::error::ApiError;

/// Unwraps a query extraction, rendering a rejection in the API error format.
pub(crate) fn query_or_bad_request<T>(
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    query
        .map(|Query(inner)| inner)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Unwraps a body extraction, rendering a rejection in the API error format.
pub(crate) fn body_or_rejection(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })
}
