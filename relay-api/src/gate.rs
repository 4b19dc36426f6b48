//! Caller authentication with a shared token.
//!
//! The token may arrive in the `x-fwd-token` header, as a bearer token or as
//! the `token` query parameter. Sources are tried in that order and the first
//! present, non-empty one is compared against the configured token.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;

/// Header carrying the caller token.
pub const FWD_TOKEN_HEADER: &str = "x-fwd-token";

/// Query parameter carrying the caller token.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Why a caller was turned away.
///
/// Both variants answer 401 with the same body; the variant is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No caller token is configured on the server.
    #[error("caller token is not configured")]
    Missing,

    /// The presented token is absent or differs from the configured one.
    #[error("caller token mismatch")]
    Mismatch,
}

/// Where a caller token can be found on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `x-fwd-token` header
    Header,
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `token` query parameter
    Query,
}

impl TokenSource {
    /// Sources in priority order.
    pub const PRIORITY: [Self; 3] = [Self::Header, Self::Bearer, Self::Query];

    /// Extracts the token this source carries, if any.
    #[must_use]
    pub fn extract(self, headers: &HeaderMap, query: Option<&str>) -> Option<String> {
        match self {
            Self::Header => headers
                .get(FWD_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            Self::Bearer => headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(extract_bearer_token)
                .map(str::to_string),
            Self::Query => query.and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(key, _)| key == TOKEN_QUERY_PARAM)
                    .map(|(_, value)| value.into_owned())
            }),
        }
    }
}

/// Collects token candidates from a request in priority order.
#[must_use]
pub fn token_candidates(headers: &HeaderMap, query: Option<&str>) -> Vec<Option<String>> {
    TokenSource::PRIORITY
        .iter()
        .map(|source| source.extract(headers, query))
        .collect()
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively.
#[must_use]
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Shared-token gate in front of the protected routes.
pub struct CallerGate {
    token: Option<SecretString>,
}

impl CallerGate {
    /// Creates a gate. An empty token counts as unset.
    #[must_use]
    pub fn new(token: Option<SecretString>) -> Self {
        let token = token.filter(|t| !t.expose_secret().is_empty());
        Self { token }
    }

    /// Returns whether a token is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Checks ordered token candidates against the configured token.
    pub fn authenticate<I>(&self, candidates: I) -> Result<(), AuthError>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let Some(expected) = &self.token else {
            return Err(AuthError::Missing);
        };

        let presented = candidates
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.is_empty())
            .ok_or(AuthError::Mismatch)?;

        if presented == expected.expose_secret() {
            Ok(())
        } else {
            Err(AuthError::Mismatch)
        }
    }

    /// Authenticates a request from its headers and raw query string.
    pub fn authenticate_request(
        &self,
        headers: &HeaderMap,
        query: Option<&str>,
    ) -> Result<(), AuthError> {
        self.authenticate(token_candidates(headers, query))
    }
}

impl fmt::Debug for CallerGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}
