//! REST client that signs and relays a single request.

use bytes::Bytes;
use reqwest::{Client, Method, StatusCode, header};
use std::time::Instant;
use tracing::debug;

use relay_core::error::NetworkError;

use super::config::RestConfig;
use super::signer::{JSON_CONTENT_TYPE, QueryString, RequestSigner};

/// Status and body of an exchange response, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedResponse {
    /// Upstream HTTP status.
    pub status: StatusCode,
    /// Upstream body bytes.
    pub body: Bytes,
}

/// REST client with optional request signing.
///
/// There are no retries: every call is one attempt bounded by the configured
/// timeout.
///
/// # Example
///
/// ```ignore
/// use relay_gateway::rest::{RestClient, RestConfig};
///
/// let client = RestClient::new(RestConfig::default())?;
/// let response = client
///     .get("/api/mix/v1/market/contracts")
///     .query("productType", "umcbl")
///     .send()
///     .await?;
/// ```
#[derive(Debug)]
pub struct RestClient {
    config: RestConfig,
    http_client: Client,
    signer: Option<RequestSigner>,
}

impl RestClient {
    /// Creates a new REST client, moving the credentials into a signer.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn new(mut config: RestConfig) -> Result<Self, NetworkError> {
        let signer = config
            .take_credentials()
            .map(|creds| RequestSigner::new(creds, config.timestamp_format));
        Self::with_signer(config, signer)
    }

    /// Creates a client with an explicit signer.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn with_signer(
        config: RestConfig,
        signer: Option<RequestSigner>,
    ) -> Result<Self, NetworkError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            config
                .user_agent
                .parse()
                .map_err(|_| NetworkError::InvalidRequest {
                    reason: "Invalid user agent".to_string(),
                })?,
        );
        headers.insert(
            "locale",
            config
                .locale
                .parse()
                .map_err(|_| NetworkError::InvalidRequest {
                    reason: "Invalid locale".to_string(),
                })?,
        );

        let http_client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            config,
            http_client,
            signer,
        })
    }

    /// Creates a GET request builder.
    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::GET, path)
    }

    /// Creates a POST request builder.
    #[must_use]
    pub fn post(&self, path: &str) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::POST, path)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// Returns the signer if credentials were configured.
    #[must_use]
    pub fn signer(&self) -> Option<&RequestSigner> {
        self.signer.as_ref()
    }

    /// Returns whether signed calls can be made.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    /// Builds the full URL for a path and an encoded query.
    #[must_use]
    pub fn build_url(&self, path: &str, query: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if query.is_empty() {
            format!("{base}{path}")
        } else {
            format!("{base}{path}?{query}")
        }
    }

    fn map_error(&self, e: &reqwest::Error) -> NetworkError {
        if e.is_timeout() {
            NetworkError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else if e.is_connect() {
            NetworkError::ConnectionFailed {
                reason: e.to_string(),
            }
        } else if e.is_builder() {
            NetworkError::InvalidRequest {
                reason: e.to_string(),
            }
        } else {
            NetworkError::Transport {
                reason: e.to_string(),
            }
        }
    }
}

/// Request builder for one exchange call.
#[must_use]
pub struct RequestBuilder<'a> {
    client: &'a RestClient,
    method: Method,
    path: String,
    query: QueryString,
    body: Option<String>,
    sign: bool,
}

impl<'a> RequestBuilder<'a> {
    fn new(client: &'a RestClient, method: Method, path: &str) -> Self {
        Self {
            client,
            method,
            path: path.to_string(),
            query: QueryString::new(),
            body: None,
            sign: false,
        }
    }

    /// Adds a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query = self.query.with(key, value);
        self
    }

    /// Replaces the query parameters.
    pub fn queries(mut self, query: QueryString) -> Self {
        self.query = query;
        self
    }

    /// Sets the serialized request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Enables request signing.
    pub fn signed(mut self) -> Self {
        self.sign = true;
        self
    }

    /// Sends the request and captures status and body.
    ///
    /// The query string and body are rendered once; the bytes that were
    /// signed are the bytes that are sent.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` on transport failure or timeout, or
    /// `NetworkError::InvalidRequest` if signing was requested without
    /// credentials.
    pub async fn send(self) -> Result<RelayedResponse, NetworkError> {
        let query = self.query.encode();
        let body = self.body.unwrap_or_default();
        let url = self.client.build_url(&self.path, &query);

        let mut request = self.client.http_client.request(self.method.clone(), &url);

        if self.sign {
            let signer = self
                .client
                .signer()
                .ok_or_else(|| NetworkError::InvalidRequest {
                    reason: "no credentials configured for a signed request".to_string(),
                })?;
            let auth = signer.sign(&self.method, &self.path, &query, &body);
            request = request.headers(auth.to_header_map()?);
        } else if !body.is_empty() {
            request = request.header(header::CONTENT_TYPE, JSON_CONTENT_TYPE);
        }

        if !body.is_empty() {
            request = request.body(body);
        }

        debug!(
            method = %self.method,
            path = %self.path,
            signed = self.sign,
            "Sending request"
        );

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| self.client.map_error(&e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.client.map_error(&e))?;

        debug!(
            method = %self.method,
            path = %self.path,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            bytes = body.len(),
            "Received response"
        );

        Ok(RelayedResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn config(base_url: &str) -> RestConfig {
        RestConfig::builder()
            .base_url(base_url)
            .api_key("key")
            .api_secret("secret")
            .passphrase("phrase")
            .build()
    }

    #[test]
    fn test_build_url() {
        let client = RestClient::new(config("http://localhost:8080/")).unwrap();
        assert_eq!(client.build_url("/a", ""), "http://localhost:8080/a");
        assert_eq!(client.build_url("/a", "x=1"), "http://localhost:8080/a?x=1");
        assert!(client.can_sign());
    }

    #[test]
    fn test_client_without_credentials_cannot_sign() {
        let client = RestClient::new(RestConfig::default()).unwrap();
        assert!(!client.can_sign());
        assert!(client.signer().is_none());
    }

    #[tokio::test]
    async fn test_signed_get_sends_auth_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/mix/v1/account/accounts")
                    .query_param("productType", "umcbl")
                    .header("access-key", "key")
                    .header("access-passphrase", "phrase")
                    .header("locale", "en-US")
                    .header_exists("access-sign")
                    .header_exists("access-timestamp");
                then.status(200).body(r#"{"code":"00000","data":[]}"#);
            })
            .await;

        let client = RestClient::new(config(&server.base_url())).unwrap();
        let response = client
            .get("/api/mix/v1/account/accounts")
            .query("productType", "umcbl")
            .signed()
            .send()
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], br#"{"code":"00000","data":[]}"#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_relayed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/p");
                then.status(400).body(r#"{"code":"40762","msg":"balance"}"#);
            })
            .await;

        let client = RestClient::new(config(&server.base_url())).unwrap();
        let response = client.post("/p").body("{}").signed().send().await.unwrap();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(&response.body[..], br#"{"code":"40762","msg":"balance"}"#);
    }

    #[tokio::test]
    async fn test_signed_without_credentials_is_local_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|_when, then| {
                then.status(200);
            })
            .await;

        let client = RestClient::new(RestConfig::builder().base_url(server.base_url()).build())
            .unwrap();
        let err = client.get("/p").signed().send().await.unwrap_err();
        assert!(matches!(err, NetworkError::InvalidRequest { .. }), "{err}");
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_timeout_maps_to_network_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200).delay(Duration::from_millis(500));
            })
            .await;

        let client = RestClient::new(
            RestConfig::builder()
                .base_url(server.base_url())
                .timeout(Duration::from_millis(50))
                .build(),
        )
        .unwrap();
        let err = client.get("/slow").send().await.unwrap_err();
        assert!(matches!(err, NetworkError::Timeout { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = RestClient::new(
            RestConfig::builder()
                .base_url("http://127.0.0.1:1")
                .timeout(Duration::from_secs(2))
                .build(),
        )
        .unwrap();
        let err = client.get("/p").send().await.unwrap_err();
        assert!(matches!(
            err,
            NetworkError::ConnectionFailed { .. } | NetworkError::Transport { .. }
        ));
    }
}
