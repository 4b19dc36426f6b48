//! Relayed exchange responses.

use axum::{
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use relay_gateway::rest::{JSON_CONTENT_TYPE, RelayedResponse};

/// Exchange response passed through to the caller unmodified.
///
/// The upstream status and body bytes are kept as is, including non-2xx
/// statuses, and the body is labelled as JSON.
#[derive(Debug)]
pub struct Relayed(pub RelayedResponse);

impl From<RelayedResponse> for Relayed {
    fn from(response: RelayedResponse) -> Self {
        Self(response)
    }
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let RelayedResponse { status, body } = self.0;
        (status, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
    }
}
