//! Request timestamp formats accepted by the exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering of the `ACCESS-TIMESTAMP` value.
///
/// The chosen format is used for both the header and the signing string.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use relay_core::types::TimestampFormat;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
/// assert_eq!(TimestampFormat::Millis.render(at), "1700000000123");
/// assert_eq!(TimestampFormat::Seconds.render(at), "1700000000.123");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// Whole milliseconds since the Unix epoch.
    #[default]
    Millis,
    /// Seconds since the Unix epoch with three decimals.
    Seconds,
}

impl TimestampFormat {
    /// Renders `at` in this format.
    #[must_use]
    pub fn render(self, at: DateTime<Utc>) -> String {
        match self {
            Self::Millis => at.timestamp_millis().to_string(),
            Self::Seconds => format!("{}.{:03}", at.timestamp(), at.timestamp_subsec_millis()),
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millis => write!(f, "millis"),
            Self::Seconds => write!(f, "seconds"),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "millis" | "milliseconds" => Ok(Self::Millis),
            "s" | "secs" | "seconds" => Ok(Self::Seconds),
            other => Err(format!(
                "unknown timestamp format `{other}`; expected one of: millis|seconds"
            )),
        }
    }
}
