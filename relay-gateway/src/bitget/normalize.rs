//! Mapping of simplified caller commands to mix v1 payloads.
//!
//! Caller bodies are loose: numbers may arrive as JSON numbers or strings and
//! flags as booleans, `0`/`1` or words. Everything is validated and coerced
//! here so the exchange only ever sees its documented wire format: numeric
//! fields as strings, optional fields omitted rather than sent as `null`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::types::{DEFAULT_MARGIN_COIN, HoldSide, OpenType, OrderSide, OrderType, TimeInForce};
use crate::rest::QueryString;

/// Rejection of a caller payload. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent, `null` or empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field is present but unusable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The body is not a JSON object of known fields.
    #[error("malformed body: {0}")]
    Malformed(String),
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// A scalar as the caller sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    /// JSON boolean.
    Flag(bool),
    /// JSON number.
    Number(serde_json::Number),
    /// JSON string.
    Text(String),
}

impl From<&str> for LooseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for LooseValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<u64> for LooseValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Place-order command as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct OrderInput {
    pub symbol: Option<String>,
    pub margin_coin: Option<String>,
    pub size: Option<LooseValue>,
    pub side: Option<String>,
    pub order_type: Option<String>,
    pub price: Option<LooseValue>,
    pub time_in_force_value: Option<String>,
    pub reduce_only: Option<LooseValue>,
    pub open_type: Option<String>,
    pub leverage: Option<LooseValue>,
    pub preset_take_profit_price: Option<LooseValue>,
    pub preset_stop_loss_price: Option<LooseValue>,
    pub client_oid: Option<String>,
}

/// Place-order payload in the exchange's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct NormalizedOrder {
    pub symbol: String,
    pub margin_coin: String,
    pub size: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub time_in_force_value: TimeInForce,
    pub reduce_only: bool,
    pub open_type: OpenType,
    pub client_oid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_take_profit_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_stop_loss_price: Option<String>,
}

/// Set-leverage command as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct LeverageInput {
    pub symbol: Option<String>,
    pub margin_coin: Option<String>,
    pub leverage: Option<LooseValue>,
    pub hold_side: Option<String>,
}

/// Set-leverage payload in the exchange's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct NormalizedLeverage {
    pub symbol: String,
    pub margin_coin: String,
    pub leverage: String,
    pub hold_side: HoldSide,
}

/// Query of the positions route. Unknown parameters (such as `token`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct PositionQuery {
    pub symbol: Option<String>,
    pub margin_coin: Option<String>,
}

impl PositionQuery {
    /// Validates the query and renders the exchange query string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField("symbol")` without a symbol.
    pub fn normalize(self) -> Result<QueryString, ValidationError> {
        let symbol = required_text("symbol", self.symbol)?;
        let margin_coin =
            optional_text(self.margin_coin).unwrap_or_else(|| DEFAULT_MARGIN_COIN.to_string());
        Ok(QueryString::new()
            .with("symbol", symbol)
            .with("marginCoin", margin_coin))
    }
}

/// Query of the product-scoped routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[allow(missing_docs)]
pub struct ProductQuery {
    pub product: Option<String>,
}

impl ProductQuery {
    /// Returns the requested product type, or `default` when absent or blank.
    #[must_use]
    pub fn product_or(self, default: &str) -> String {
        optional_text(self.product).unwrap_or_else(|| default.to_string())
    }
}

/// Process-wide source of generated `clientOid` values.
///
/// Values are `srv-<millis>` and strictly increasing: two orders in the same
/// millisecond get consecutive numbers instead of colliding.
#[derive(Debug, Default)]
pub struct ClientOidSource {
    last: AtomicU64,
}

impl ClientOidSource {
    /// Prefix of generated identifiers.
    pub const PREFIX: &'static str = "srv-";

    /// Creates a new source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues an identifier for the current time.
    #[must_use]
    pub fn next_oid(&self) -> String {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        self.next_at(now)
    }

    /// Issues an identifier for `now_ms`, never repeating a previous one.
    #[must_use]
    pub fn next_at(&self, now_ms: u64) -> String {
        let issue = |last: u64| now_ms.max(last.saturating_add(1));
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(issue(last)))
            .unwrap_or_else(|last| last);
        format!("{}{}", Self::PREFIX, issue(previous))
    }
}

/// Parses a request body, treating an empty body as an empty object.
///
/// # Errors
///
/// Returns `ValidationError::Malformed` for invalid JSON, non-object bodies
/// and unknown fields.
pub fn parse_body<T>(body: &[u8]) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Validates a place-order command and fills defaults.
///
/// # Errors
///
/// Returns `ValidationError` if a required field is missing or a field is
/// malformed. A limit order without a price is rejected.
pub fn normalize_order(
    input: OrderInput,
    oids: &ClientOidSource,
) -> Result<NormalizedOrder, ValidationError> {
    let symbol = required_text("symbol", input.symbol)?;
    let size = positive_number("size", input.size)?.ok_or(ValidationError::MissingField("size"))?;
    let side = parse_choice::<OrderSide>("side", &required_text("side", input.side)?)?;

    let order_type = choice("orderType", input.order_type, OrderType::Market)?;
    let price = positive_number("price", input.price)?;
    if order_type == OrderType::Limit && price.is_none() {
        return Err(ValidationError::MissingField("price"));
    }

    Ok(NormalizedOrder {
        symbol,
        margin_coin: optional_text(input.margin_coin)
            .unwrap_or_else(|| DEFAULT_MARGIN_COIN.to_string()),
        size,
        side,
        order_type,
        price,
        time_in_force_value: choice(
            "timeInForceValue",
            input.time_in_force_value,
            TimeInForce::Normal,
        )?,
        reduce_only: flag("reduceOnly", input.reduce_only)?,
        open_type: choice("openType", input.open_type, OpenType::Isolated)?,
        client_oid: optional_text(input.client_oid).unwrap_or_else(|| oids.next_oid()),
        leverage: positive_number("leverage", input.leverage)?,
        preset_take_profit_price: positive_number(
            "presetTakeProfitPrice",
            input.preset_take_profit_price,
        )?,
        preset_stop_loss_price: positive_number(
            "presetStopLossPrice",
            input.preset_stop_loss_price,
        )?,
    })
}

/// Validates a set-leverage command and fills defaults.
///
/// # Errors
///
/// Returns `ValidationError` if `symbol` or `leverage` is missing, or if
/// `leverage` is not a positive number.
pub fn normalize_leverage(input: LeverageInput) -> Result<NormalizedLeverage, ValidationError> {
    let symbol = required_text("symbol", input.symbol)?;
    let leverage = positive_number("leverage", input.leverage)?
        .ok_or(ValidationError::MissingField("leverage"))?;
    Ok(NormalizedLeverage {
        symbol,
        margin_coin: optional_text(input.margin_coin)
            .unwrap_or_else(|| DEFAULT_MARGIN_COIN.to_string()),
        leverage,
        hold_side: choice("holdSide", input.hold_side, HoldSide::Long)?,
    })
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    optional_text(value).ok_or(ValidationError::MissingField(field))
}

fn parse_choice<T>(field: &'static str, raw: &str) -> Result<T, ValidationError>
where
    T: FromStr<Err = String>,
{
    raw.parse().map_err(|reason| ValidationError::invalid(field, reason))
}

fn choice<T>(field: &'static str, value: Option<String>, default: T) -> Result<T, ValidationError>
where
    T: FromStr<Err = String>,
{
    optional_text(value).map_or(Ok(default), |raw| parse_choice(field, &raw))
}

/// Coerces a numeric field to its string form. Empty means absent.
fn positive_number(
    field: &'static str,
    value: Option<LooseValue>,
) -> Result<Option<String>, ValidationError> {
    let text = match value {
        None => return Ok(None),
        Some(LooseValue::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.to_string()
        }
        Some(LooseValue::Number(n)) => n.to_string(),
        Some(LooseValue::Flag(_)) => {
            return Err(ValidationError::invalid(field, "expected a number"));
        }
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(Some(text)),
        Ok(_) => Err(ValidationError::invalid(field, "must be greater than 0")),
        Err(_) => Err(ValidationError::invalid(
            field,
            format!("`{text}` is not a number"),
        )),
    }
}

fn flag(field: &'static str, value: Option<LooseValue>) -> Result<bool, ValidationError> {
    match value {
        None => Ok(false),
        Some(LooseValue::Flag(b)) => Ok(b),
        Some(LooseValue::Number(n)) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ValidationError::invalid(field, "expected a boolean")),
        },
        Some(LooseValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "0" => Ok(false),
            "true" | "yes" | "1" => Ok(true),
            _ => Err(ValidationError::invalid(field, "expected a boolean")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(value: serde_json::Value) -> Result<NormalizedOrder, ValidationError> {
        let input: OrderInput = serde_json::from_value(value).unwrap();
        normalize_order(input, &ClientOidSource::new())
    }

    #[test]
    fn test_minimal_order_gets_defaults() {
        let normalized =
            order(json!({"symbol": "BTCUSDT_UMCBL", "size": 10, "side": "open_long"})).unwrap();

        let payload = serde_json::to_value(&normalized).unwrap();
        assert_eq!(payload["symbol"], "BTCUSDT_UMCBL");
        assert_eq!(payload["size"], "10");
        assert_eq!(payload["side"], "open_long");
        assert_eq!(payload["marginCoin"], "USDT");
        assert_eq!(payload["orderType"], "market");
        assert_eq!(payload["timeInForceValue"], "normal");
        assert_eq!(payload["openType"], "isolated");
        assert_eq!(payload["reduceOnly"], false);
        assert!(payload["clientOid"].as_str().unwrap().starts_with("srv-"));

        let obj = payload.as_object().unwrap();
        for absent in ["leverage", "presetTakeProfitPrice", "presetStopLossPrice", "price"] {
            assert!(!obj.contains_key(absent), "{absent} should be omitted");
        }
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            order(json!({"size": 1, "side": "buy"})),
            Err(ValidationError::MissingField("symbol"))
        );
        assert_eq!(
            order(json!({"symbol": "X", "size": null, "side": "buy"})),
            Err(ValidationError::MissingField("size"))
        );
        assert_eq!(
            order(json!({"symbol": "X", "size": "", "side": "buy"})),
            Err(ValidationError::MissingField("size"))
        );
        assert_eq!(
            order(json!({"symbol": "X", "size": 1, "side": " "})),
            Err(ValidationError::MissingField("side"))
        );
        assert_eq!(
            order(json!({"symbol": "", "size": 1, "side": "buy"})),
            Err(ValidationError::MissingField("symbol"))
        );
    }

    #[test]
    fn test_size_coercion() {
        let n = order(json!({"symbol": "X", "size": "0.015", "side": "buy"})).unwrap();
        assert_eq!(n.size, "0.015");
        let n = order(json!({"symbol": "X", "size": 0.5, "side": "buy"})).unwrap();
        assert_eq!(n.size, "0.5");

        assert!(matches!(
            order(json!({"symbol": "X", "size": 0, "side": "buy"})),
            Err(ValidationError::InvalidField { field: "size", .. })
        ));
        assert!(matches!(
            order(json!({"symbol": "X", "size": "-1", "side": "buy"})),
            Err(ValidationError::InvalidField { field: "size", .. })
        ));
        assert!(matches!(
            order(json!({"symbol": "X", "size": "ten", "side": "buy"})),
            Err(ValidationError::InvalidField { field: "size", .. })
        ));
        assert!(matches!(
            order(json!({"symbol": "X", "size": true, "side": "buy"})),
            Err(ValidationError::InvalidField { field: "size", .. })
        ));
    }

    #[test]
    fn test_unknown_side_is_invalid() {
        assert!(matches!(
            order(json!({"symbol": "X", "size": 1, "side": "long"})),
            Err(ValidationError::InvalidField { field: "side", .. })
        ));
    }

    #[test]
    fn test_reduce_only_coercion() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("yes"), true),
            (json!("NO"), false),
            (json!("1"), true),
            (json!("false"), false),
        ] {
            let n = order(json!({"symbol": "X", "size": 1, "side": "buy", "reduceOnly": raw}))
                .unwrap();
            assert_eq!(n.reduce_only, expected);
        }
        assert!(
            order(json!({"symbol": "X", "size": 1, "side": "buy", "reduceOnly": "maybe"}))
                .is_err()
        );
        assert!(order(json!({"symbol": "X", "size": 1, "side": "buy", "reduceOnly": 2})).is_err());
    }

    #[test]
    fn test_optional_numbers_are_stringified_or_omitted() {
        let n = order(json!({
            "symbol": "X", "size": 1, "side": "open_long",
            "leverage": 20, "presetTakeProfitPrice": 70000.5, "presetStopLossPrice": ""
        }))
        .unwrap();
        assert_eq!(n.leverage.as_deref(), Some("20"));
        assert_eq!(n.preset_take_profit_price.as_deref(), Some("70000.5"));
        assert_eq!(n.preset_stop_loss_price, None);

        let n = order(json!({
            "symbol": "X", "size": 1, "side": "open_long", "leverage": null
        }))
        .unwrap();
        assert_eq!(n.leverage, None);
    }

    #[test]
    fn test_limit_order_requires_price() {
        assert_eq!(
            order(json!({"symbol": "X", "size": 1, "side": "buy", "orderType": "limit"})),
            Err(ValidationError::MissingField("price"))
        );
        let n = order(json!({
            "symbol": "X", "size": 1, "side": "buy", "orderType": "limit", "price": "100.5"
        }))
        .unwrap();
        assert_eq!(n.order_type, OrderType::Limit);
        assert_eq!(n.price.as_deref(), Some("100.5"));
    }

    #[test]
    fn test_caller_client_oid_is_kept() {
        let n = order(json!({"symbol": "X", "size": 1, "side": "buy", "clientOid": "mine-1"}))
            .unwrap();
        assert_eq!(n.client_oid, "mine-1");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            json!({"symbol": "BTCUSDT_UMCBL", "size": 10, "side": "open_long"}),
            json!({
                "symbol": "ETHUSDT_UMCBL", "size": "0.2", "side": "close_short",
                "orderType": "limit", "price": 3000, "reduceOnly": "yes",
                "leverage": "5", "presetStopLossPrice": 2500, "openType": "crossed",
                "timeInForceValue": "post_only", "marginCoin": "USDC"
            }),
        ];
        let oids = ClientOidSource::new();
        for input in inputs {
            let first =
                normalize_order(serde_json::from_value(input).unwrap(), &oids).unwrap();
            let replay: OrderInput =
                serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();
            let second = normalize_order(replay, &oids).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_unknown_fields_are_malformed() {
        let err = parse_body::<OrderInput>(br#"{"symbol":"X","qty":1}"#).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn test_non_object_bodies_are_malformed() {
        for body in [&b"[1,2]"[..], b"\"x\"", b"42", b"{not json"] {
            assert!(matches!(
                parse_body::<OrderInput>(body),
                Err(ValidationError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        let input = parse_body::<OrderInput>(b"  ").unwrap();
        assert_eq!(input, OrderInput::default());
        assert_eq!(
            normalize_order(input, &ClientOidSource::new()),
            Err(ValidationError::MissingField("symbol"))
        );
    }

    #[test]
    fn test_client_oids_are_unique_within_a_millisecond() {
        let oids = ClientOidSource::new();
        assert_eq!(oids.next_at(1_000), "srv-1000");
        assert_eq!(oids.next_at(1_000), "srv-1001");
        assert_eq!(oids.next_at(999), "srv-1002");
        assert_eq!(oids.next_at(5_000), "srv-5000");
    }

    #[test]
    fn test_client_oids_are_unique_across_threads() {
        let oids = std::sync::Arc::new(ClientOidSource::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let oids = oids.clone();
                std::thread::spawn(move || (0..250).map(|_| oids.next_oid()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_leverage_defaults() {
        let input: LeverageInput =
            serde_json::from_value(json!({"symbol": "BTCUSDT_UMCBL", "leverage": 10})).unwrap();
        let n = normalize_leverage(input).unwrap();
        assert_eq!(
            serde_json::to_value(&n).unwrap(),
            json!({"symbol": "BTCUSDT_UMCBL", "marginCoin": "USDT", "leverage": "10", "holdSide": "long"})
        );
    }

    #[test]
    fn test_leverage_validation() {
        let missing: LeverageInput = serde_json::from_value(json!({"symbol": "X"})).unwrap();
        assert_eq!(
            normalize_leverage(missing),
            Err(ValidationError::MissingField("leverage"))
        );
        let bad_side: LeverageInput =
            serde_json::from_value(json!({"symbol": "X", "leverage": "3", "holdSide": "up"}))
                .unwrap();
        assert!(matches!(
            normalize_leverage(bad_side),
            Err(ValidationError::InvalidField { field: "holdSide", .. })
        ));
        let zero: LeverageInput =
            serde_json::from_value(json!({"symbol": "X", "leverage": 0})).unwrap();
        assert!(normalize_leverage(zero).is_err());
    }

    #[test]
    fn test_position_query() {
        let query = PositionQuery {
            symbol: Some("BTCUSDT_UMCBL".to_string()),
            margin_coin: None,
        };
        assert_eq!(
            query.normalize().unwrap().encode(),
            "symbol=BTCUSDT_UMCBL&marginCoin=USDT"
        );
        assert_eq!(
            PositionQuery::default().normalize(),
            Err(ValidationError::MissingField("symbol"))
        );
    }

    #[test]
    fn test_product_query() {
        assert_eq!(ProductQuery::default().product_or("umcbl"), "umcbl");
        let q = ProductQuery {
            product: Some("dmcbl".to_string()),
        };
        assert_eq!(q.product_or("umcbl"), "dmcbl");
    }
}
