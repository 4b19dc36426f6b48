//! Request signing for the exchange REST API.
//!
//! The exchange authenticates a request with four headers. `ACCESS-SIGN` is
//! `base64(HMAC-SHA256(secret, timestamp + METHOD + requestPath + body))`,
//! where `requestPath` is the path followed by `?query` only when a query
//! string exists.

use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;

use relay_core::error::NetworkError;
use relay_core::types::{Credentials, TimestampFormat};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key.
pub const ACCESS_KEY: &str = "ACCESS-KEY";
/// Header carrying the base64 signature.
pub const ACCESS_SIGN: &str = "ACCESS-SIGN";
/// Header carrying the timestamp used in the signature.
pub const ACCESS_TIMESTAMP: &str = "ACCESS-TIMESTAMP";
/// Header carrying the API passphrase.
pub const ACCESS_PASSPHRASE: &str = "ACCESS-PASSPHRASE";
/// Content type of every signed call.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Ordered query parameters, encoded in insertion order.
///
/// The encoded form is used both in the signing string and in the outbound
/// URL, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Returns true if no parameters were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the `application/x-www-form-urlencoded` form, without a leading `?`.
    #[must_use]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }
}

/// The inputs of one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path without query, e.g. `/api/mix/v1/order/placeOrder`.
    pub path: String,
    /// Encoded query string without `?`; empty when there is none.
    pub query: String,
    /// Serialized body; empty for bodiless requests.
    pub body: String,
    /// Timestamp string, rendered once and reused for the header.
    pub timestamp: String,
}

impl SignedRequest {
    /// Returns the path with `?query` appended when a query exists.
    #[must_use]
    pub fn request_path(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Returns the canonical string fed to the HMAC.
    #[must_use]
    pub fn prehash(&self) -> String {
        format!(
            "{}{}{}{}",
            self.timestamp,
            self.method.as_str().to_ascii_uppercase(),
            self.request_path(),
            self.body
        )
    }
}

/// Authentication headers for one outbound call.
///
/// Built fresh for every request: the timestamp is part of the signature and
/// the exchange rejects stale values.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// `ACCESS-KEY`
    pub access_key: String,
    /// `ACCESS-SIGN`
    pub signature: String,
    /// `ACCESS-TIMESTAMP`
    pub timestamp: String,
    /// `ACCESS-PASSPHRASE`
    pub passphrase: String,
    /// `Content-Type`
    pub content_type: &'static str,
}

impl AuthHeaders {
    /// Converts to a header map.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidRequest` if a credential contains bytes
    /// that are not valid in a header value.
    pub fn to_header_map(&self) -> Result<HeaderMap, NetworkError> {
        let mut headers = HeaderMap::with_capacity(5);
        for (name, value) in [
            (ACCESS_KEY, self.access_key.as_str()),
            (ACCESS_SIGN, self.signature.as_str()),
            (ACCESS_TIMESTAMP, self.timestamp.as_str()),
            (ACCESS_PASSPHRASE, self.passphrase.as_str()),
        ] {
            let value = HeaderValue::from_str(value).map_err(|_| NetworkError::InvalidRequest {
                reason: format!("{name} is not a valid header value"),
            })?;
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                NetworkError::InvalidRequest {
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        Ok(headers)
    }
}

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("access_key", &self.access_key)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

/// Clock used for timestamps; injectable for deterministic tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Request signer holding the exchange credentials.
///
/// # Example
///
/// ```ignore
/// let signer = RequestSigner::new(credentials, TimestampFormat::Millis);
/// let headers = signer.sign(&Method::GET, "/api/mix/v1/account/accounts", "productType=umcbl", "");
/// ```
#[derive(Clone)]
pub struct RequestSigner {
    credentials: Arc<Credentials>,
    timestamp_format: TimestampFormat,
    clock: Clock,
}

impl RequestSigner {
    /// Creates a new signer using the system clock.
    #[must_use]
    pub fn new(credentials: Credentials, timestamp_format: TimestampFormat) -> Self {
        Self {
            credentials: Arc::new(credentials),
            timestamp_format,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Signs a request at the current time.
    #[must_use]
    pub fn sign(&self, method: &Method, path: &str, query: &str, body: &str) -> AuthHeaders {
        let timestamp = self.timestamp_format.render((self.clock)());
        self.sign_request(&SignedRequest {
            method: method.clone(),
            path: path.to_string(),
            query: query.to_string(),
            body: body.to_string(),
            timestamp,
        })
    }

    /// Signs a fully specified request.
    #[must_use]
    pub fn sign_request(&self, request: &SignedRequest) -> AuthHeaders {
        AuthHeaders {
            access_key: self.credentials.api_key().to_string(),
            signature: self.sign_message(&request.prehash()),
            timestamp: request.timestamp.clone(),
            passphrase: self.credentials.passphrase().to_string(),
            content_type: JSON_CONTENT_TYPE,
        }
    }

    /// Returns `base64(HMAC-SHA256(secret, message))`.
    #[must_use]
    pub fn sign_message(&self, message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(message.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("credentials", &self.credentials)
            .field("timestamp_format", &self.timestamp_format)
            .finish_non_exhaustive()
    }
}
