//! Bitget mix (futures) v1 API types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange endpoints used by the gateway.
pub mod endpoints {
    /// Public contract list.
    pub const CONTRACTS: &str = "/api/mix/v1/market/contracts";
    /// Single position for a symbol and margin coin.
    pub const SINGLE_POSITION: &str = "/api/mix/v1/position/singlePosition";
    /// Account list for a product type.
    pub const ACCOUNTS: &str = "/api/mix/v1/account/accounts";
    /// Set leverage.
    pub const SET_LEVERAGE: &str = "/api/mix/v1/account/setLeverage";
    /// Place order.
    pub const PLACE_ORDER: &str = "/api/mix/v1/order/placeOrder";
}

/// Default margin coin when the caller omits one.
pub const DEFAULT_MARGIN_COIN: &str = "USDT";

/// Declares a string enum with serde names, `Display` and `FromStr`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            /// Returns the wire value.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} `{other}`; expected one of: {}",
                        $field,
                        [$($wire),+].join("|")
                    )),
                }
            }
        }
    };
}

wire_enum! {
    /// Order side in the mix v1 one-way/hedge vocabulary.
    OrderSide, "side" {
        /// Open a long position
        OpenLong => "open_long",
        /// Open a short position
        OpenShort => "open_short",
        /// Close a long position
        CloseLong => "close_long",
        /// Close a short position
        CloseShort => "close_short",
        /// One-way mode buy
        Buy => "buy",
        /// One-way mode sell
        Sell => "sell",
    }
}

wire_enum! {
    /// Order type.
    OrderType, "orderType" {
        /// Market order
        Market => "market",
        /// Limit order, requires a price
        Limit => "limit",
    }
}

wire_enum! {
    /// Time in force.
    TimeInForce, "timeInForceValue" {
        /// Good till cancelled
        Normal => "normal",
        /// Maker only
        PostOnly => "post_only",
        /// Fill or kill
        Fok => "fok",
        /// Immediate or cancel
        Ioc => "ioc",
    }
}

wire_enum! {
    /// Margin mode attached to an order.
    OpenType, "openType" {
        /// Isolated margin
        Isolated => "isolated",
        /// Cross margin
        Crossed => "crossed",
    }
}

wire_enum! {
    /// Position side a leverage setting applies to.
    HoldSide, "holdSide" {
        /// Long side
        Long => "long",
        /// Short side
        Short => "short",
        /// Both sides (cross margin)
        Both => "both",
    }
}

/// Bitget REST API response wrapper.
///
/// Parsed only for diagnostics; the gateway relays the raw body.
#[derive(Debug, Clone, Deserialize)]
pub struct BitgetApiResponse<T> {
    /// Response code ("00000" for success)
    pub code: String,
    /// Response message
    #[serde(default)]
    pub msg: String,
    /// Request time
    #[serde(default, rename = "requestTime")]
    pub request_time: Option<i64>,
    /// Data payload
    pub data: Option<T>,
}

impl<T> BitgetApiResponse<T> {
    /// Returns true if the response indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == "00000"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_side_wire_names() {
        assert_eq!(OrderSide::OpenLong.as_str(), "open_long");
        assert_eq!(
            serde_json::to_string(&OrderSide::CloseShort).unwrap(),
            "\"close_short\""
        );
        assert_eq!("sell".parse::<OrderSide>(), Ok(OrderSide::Sell));
    }

    #[test]
    fn test_unknown_value_lists_choices() {
        let err = "long".parse::<OrderSide>().unwrap_err();
        assert!(err.contains("open_long|open_short"));
        assert!("cross".parse::<OpenType>().is_err());
        assert_eq!("both".parse::<HoldSide>(), Ok(HoldSide::Both));
        assert_eq!("post_only".parse::<TimeInForce>(), Ok(TimeInForce::PostOnly));
    }

    #[test]
    fn test_envelope_success() {
        let resp: BitgetApiResponse<serde_json::Value> = serde_json::from_str(
            r#"{"code":"00000","msg":"success","requestTime":1700000000000,"data":{"orderId":"1"}}"#,
        )
        .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.request_time, Some(1_700_000_000_000));
    }

    #[test]
    fn test_envelope_error_without_data() {
        let resp: BitgetApiResponse<serde::de::IgnoredAny> =
            serde_json::from_str(r#"{"code":"40009","msg":"sign signature error"}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.msg, "sign signature error");
    }
}
