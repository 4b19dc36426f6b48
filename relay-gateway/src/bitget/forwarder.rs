//! Signed relay of caller commands to the Bitget mix v1 API.

use reqwest::Method;
use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::{debug, warn};

use relay_core::error::NetworkError;

use super::normalize::{
    ClientOidSource, LeverageInput, OrderInput, PositionQuery, ProductQuery, ValidationError,
    normalize_leverage, normalize_order,
};
use super::types::{BitgetApiResponse, endpoints};
use crate::error::ForwardError;
use crate::rest::{QueryString, RelayedResponse, RestClient, RestConfig};

/// One outbound exchange call, fully rendered except for its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeCall {
    /// Short name used in logs.
    pub route: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Exchange path.
    pub path: &'static str,
    /// Query parameters.
    pub query: QueryString,
    /// Serialized JSON body.
    pub body: Option<String>,
    /// Whether the call carries authentication headers.
    pub signed: bool,
}

impl ExchangeCall {
    /// Unsigned GET.
    #[must_use]
    pub fn public_get(route: &'static str, path: &'static str, query: QueryString) -> Self {
        Self {
            route,
            method: Method::GET,
            path,
            query,
            body: None,
            signed: false,
        }
    }

    /// Signed GET.
    #[must_use]
    pub fn signed_get(route: &'static str, path: &'static str, query: QueryString) -> Self {
        Self {
            signed: true,
            ..Self::public_get(route, path, query)
        }
    }

    /// Signed POST; the payload is serialized here, once.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Malformed` if the payload does not serialize.
    pub fn signed_post<T: Serialize>(
        route: &'static str,
        path: &'static str,
        payload: &T,
    ) -> Result<Self, ValidationError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Ok(Self {
            route,
            method: Method::POST,
            path,
            query: QueryString::new(),
            body: Some(body),
            signed: true,
        })
    }
}

/// Forwarder for the gateway's exchange routes.
///
/// Every operation validates first, and only then touches the network.
/// Responses are relayed byte for byte whatever their status.
#[derive(Debug)]
pub struct BitgetForwarder {
    client: RestClient,
    oids: ClientOidSource,
}

impl BitgetForwarder {
    /// Creates a forwarder over an existing client.
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            oids: ClientOidSource::new(),
        }
    }

    /// Builds the client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn from_config(config: RestConfig) -> Result<Self, NetworkError> {
        RestClient::new(config).map(Self::new)
    }

    /// Returns whether signed routes can be served.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.client.can_sign()
    }

    /// Returns the product type used when a caller names none.
    #[must_use]
    pub fn default_product_type(&self) -> &str {
        &self.client.config().product_type
    }

    /// Lists contracts for a product type. Public market data, not signed.
    pub async fn contracts(&self, query: ProductQuery) -> Result<RelayedResponse, ForwardError> {
        let product = query.product_or(self.default_product_type());
        self.forward(ExchangeCall::public_get(
            "contracts",
            endpoints::CONTRACTS,
            QueryString::new().with("productType", product),
        ))
        .await
    }

    /// Fetches the position for one symbol and margin coin.
    pub async fn single_position(
        &self,
        query: PositionQuery,
    ) -> Result<RelayedResponse, ForwardError> {
        self.ensure_signer()?;
        let query = query.normalize()?;
        self.forward(ExchangeCall::signed_get(
            "positions",
            endpoints::SINGLE_POSITION,
            query,
        ))
        .await
    }

    /// Fetches the account list for a product type.
    pub async fn accounts(&self, query: ProductQuery) -> Result<RelayedResponse, ForwardError> {
        self.ensure_signer()?;
        let product = query.product_or(self.default_product_type());
        self.forward(ExchangeCall::signed_get(
            "auth",
            endpoints::ACCOUNTS,
            QueryString::new().with("productType", product),
        ))
        .await
    }

    /// Sets leverage for a symbol.
    pub async fn set_leverage(&self, input: LeverageInput) -> Result<RelayedResponse, ForwardError> {
        self.ensure_signer()?;
        let payload = normalize_leverage(input)?;
        self.forward(ExchangeCall::signed_post(
            "leverage",
            endpoints::SET_LEVERAGE,
            &payload,
        )?)
        .await
    }

    /// Places an order.
    pub async fn place_order(&self, input: OrderInput) -> Result<RelayedResponse, ForwardError> {
        self.ensure_signer()?;
        let payload = normalize_order(input, &self.oids)?;
        debug!(
            symbol = %payload.symbol,
            side = %payload.side,
            size = %payload.size,
            client_oid = %payload.client_oid,
            "Placing order"
        );
        self.forward(ExchangeCall::signed_post(
            "order",
            endpoints::PLACE_ORDER,
            &payload,
        )?)
        .await
    }

    /// Sends a rendered call and relays the response.
    ///
    /// # Errors
    ///
    /// Returns `ForwardError::NotConfigured` for a signed call without
    /// credentials and `ForwardError::Upstream` on transport failure.
    pub async fn forward(&self, call: ExchangeCall) -> Result<RelayedResponse, ForwardError> {
        if call.signed {
            self.ensure_signer()?;
        }

        let route = call.route;
        let builder = if call.method == Method::POST {
            self.client.post(call.path)
        } else {
            self.client.get(call.path)
        };
        let mut request = builder.queries(call.query);
        if let Some(body) = call.body {
            request = request.body(body);
        }
        if call.signed {
            request = request.signed();
        }

        let response = request.send().await.map_err(|e| {
            warn!(route, error = %e, "Upstream call failed");
            ForwardError::Upstream(e)
        })?;
        log_outcome(route, &response);
        Ok(response)
    }

    fn ensure_signer(&self) -> Result<(), ForwardError> {
        if self.client.can_sign() {
            Ok(())
        } else {
            Err(ForwardError::NotConfigured)
        }
    }
}

/// Best-effort look at the exchange envelope. Never alters the response.
fn log_outcome(route: &'static str, response: &RelayedResponse) {
    let status = response.status.as_u16();
    match serde_json::from_slice::<BitgetApiResponse<IgnoredAny>>(&response.body) {
        Ok(envelope) if envelope.is_success() => {
            debug!(route, status, "Exchange accepted request");
        }
        Ok(envelope) => {
            warn!(
                route,
                status,
                code = %envelope.code,
                msg = %envelope.msg,
                "Exchange rejected request"
            );
        }
        Err(_) if !response.status.is_success() => {
            warn!(route, status, "Exchange returned a non-success status");
        }
        Err(_) => {
            debug!(route, status, "Exchange response carries no envelope");
        }
    }
}
