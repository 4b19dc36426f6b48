//! Exchange REST client configuration.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use relay_core::config::{
    Configurable, EnvLookup, Validatable, deserialize_optional_secret, env_parse, env_string,
    secret_from_env,
};
use relay_core::error::ConfigError;
use relay_core::types::{Credentials, TimestampFormat};

/// Default exchange endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.bitget.com";

/// Default product type (USDT-margined perpetuals).
pub const DEFAULT_PRODUCT_TYPE: &str = "umcbl";

/// Configuration for the exchange REST client.
///
/// Credentials are optional. Without all three parts no signer is built and
/// signed routes are refused.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestConfig {
    /// Base URL for API requests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `ACCESS-KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API secret used as the HMAC key.
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub api_secret: Option<SecretString>,

    /// API passphrase.
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub passphrase: Option<SecretString>,

    /// Product type used when the caller does not name one.
    #[serde(default = "default_product_type")]
    pub product_type: String,

    /// Rendering of `ACCESS-TIMESTAMP`.
    #[serde(default)]
    pub timestamp_format: TimestampFormat,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Value of the `locale` header.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_product_type() -> String {
    DEFAULT_PRODUCT_TYPE.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_user_agent() -> String {
    format!("relay/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_secret: None,
            passphrase: None,
            product_type: default_product_type(),
            timestamp_format: TimestampFormat::default(),
            timeout_ms: default_timeout_ms(),
            locale: default_locale(),
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .field("product_type", &self.product_type)
            .field("timestamp_format", &self.timestamp_format)
            .field("timeout_ms", &self.timeout_ms)
            .field("locale", &self.locale)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RestConfig {
    /// Creates a new builder for `RestConfig`.
    #[must_use]
    pub fn builder() -> RestConfigBuilder {
        RestConfigBuilder::default()
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns whether all three credential parts are configured.
    #[must_use]
    pub fn has_auth(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.api_secret.is_some()
            && self.passphrase.is_some()
    }

    /// Names the credential parts that are missing, in declaration order.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            missing.push("api_key");
        }
        if self.api_secret.is_none() {
            missing.push("api_secret");
        }
        if self.passphrase.is_none() {
            missing.push("passphrase");
        }
        missing
    }

    /// Moves the credentials out of the config.
    ///
    /// Returns `None`, leaving the config untouched, unless all three parts
    /// are present.
    pub fn take_credentials(&mut self) -> Option<Credentials> {
        if !self.has_auth() {
            return None;
        }
        let api_key = self.api_key.take()?;
        let api_secret = self.api_secret.take()?;
        let passphrase = self.passphrase.take()?;
        Some(Credentials::new(api_key, api_secret, passphrase))
    }
}

impl Validatable for RestConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::invalid_value("exchange.base_url", format!("{}: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid_value(
                "exchange.base_url",
                "scheme must be http or https",
            ));
        }
        if self.product_type.trim().is_empty() {
            return Err(ConfigError::missing_field_in_section(
                "product_type",
                "exchange",
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "exchange.timeout_ms",
                "timeout must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Configurable for RestConfig {
    fn apply_env_overrides(&mut self, lookup: &EnvLookup<'_>) -> Result<(), ConfigError> {
        if let Some(base_url) = env_string(lookup, "API_BASE") {
            self.base_url = base_url;
        }
        if let Some(api_key) = env_string(lookup, "API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(secret) = secret_from_env(lookup, "API_SECRET") {
            self.api_secret = Some(secret);
        }
        if let Some(passphrase) = secret_from_env(lookup, "API_PASSPHRASE") {
            self.passphrase = Some(passphrase);
        }
        if let Some(product_type) = env_string(lookup, "PRODUCT_TYPE") {
            self.product_type = product_type;
        }
        if let Some(format) = env_parse::<TimestampFormat>(lookup, "TIMESTAMP_FORMAT")? {
            self.timestamp_format = format;
        }
        if let Some(timeout_ms) = env_parse::<u64>(lookup, "UPSTREAM_TIMEOUT_MS")? {
            self.timeout_ms = timeout_ms;
        }
        Ok(())
    }

    fn env_var_names() -> Vec<&'static str> {
        vec![
            "API_BASE",
            "API_KEY",
            "API_SECRET",
            "API_PASSPHRASE",
            "PRODUCT_TYPE",
            "TIMESTAMP_FORMAT",
            "UPSTREAM_TIMEOUT_MS",
        ]
    }
}

/// Builder for `RestConfig`.
#[derive(Debug, Default)]
pub struct RestConfigBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    api_secret: Option<SecretString>,
    passphrase: Option<SecretString>,
    product_type: Option<String>,
    timestamp_format: Option<TimestampFormat>,
    timeout_ms: Option<u64>,
    user_agent: Option<String>,
}

impl RestConfigBuilder {
    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API secret.
    #[must_use]
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Sets the passphrase.
    #[must_use]
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(SecretString::from(passphrase.into()));
        self
    }

    /// Sets the default product type.
    #[must_use]
    pub fn product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    /// Sets the timestamp format.
    #[must_use]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the `RestConfig`.
    #[must_use]
    pub fn build(self) -> RestConfig {
        let defaults = RestConfig::default();
        RestConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            api_key: self.api_key,
            api_secret: self.api_secret.filter(|s| !s.expose_secret().is_empty()),
            passphrase: self.passphrase.filter(|s| !s.expose_secret().is_empty()),
            product_type: self.product_type.unwrap_or(defaults.product_type),
            timestamp_format: self.timestamp_format.unwrap_or_default(),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
            locale: defaults.locale,
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_builder() {
        let config = RestConfig::builder()
            .base_url("http://127.0.0.1:9000")
            .api_key("my_key")
            .api_secret("my_secret")
            .passphrase("my_pass")
            .timeout(Duration::from_secs(5))
            .timestamp_format(TimestampFormat::Seconds)
            .build();

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api_key.as_deref(), Some("my_key"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.timestamp_format, TimestampFormat::Seconds);
        assert!(config.has_auth());
    }

    #[test]
    fn test_config_defaults() {
        let config = RestConfig::default();

        assert_eq!(config.base_url, "https://api.bitget.com");
        assert_eq!(config.product_type, "umcbl");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.locale, "en-US");
        assert_eq!(config.timestamp_format, TimestampFormat::Millis);
        assert!(!config.has_auth());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials() {
        let config = RestConfig::builder().api_key("k").build();
        assert_eq!(config.missing_credentials(), vec!["api_secret", "passphrase"]);
        assert!(!config.has_auth());
    }

    #[test]
    fn test_take_credentials() {
        let mut config = RestConfig::builder()
            .api_key("k")
            .api_secret("s")
            .passphrase("p")
            .build();
        let creds = config.take_credentials().unwrap();
        assert_eq!(creds.api_key(), "k");
        assert_eq!(creds.api_secret(), "s");
        assert!(config.take_credentials().is_none());

        let mut partial = RestConfig::builder().api_key("k").api_secret("s").build();
        assert!(partial.take_credentials().is_none());
        assert_eq!(partial.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: RestConfig =
            serde_json::from_str(r#"{"api_key":"k","api_secret":"s","passphrase":""}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_secret.as_ref().unwrap().expose_secret(), "s");
        assert!(config.passphrase.is_none());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result = serde_json::from_str::<RestConfig>(r#"{"retries":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RestConfig::default();
        let lookup = lookup_from(&[
            ("API_BASE", "http://localhost:1234"),
            ("API_KEY", "env-key"),
            ("API_SECRET", "env-secret"),
            ("API_PASSPHRASE", "env-pass"),
            ("PRODUCT_TYPE", "dmcbl"),
            ("TIMESTAMP_FORMAT", "seconds"),
            ("UPSTREAM_TIMEOUT_MS", "2500"),
        ]);
        config.apply_env_overrides(&lookup).unwrap();

        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.product_type, "dmcbl");
        assert_eq!(config.timestamp_format, TimestampFormat::Seconds);
        assert_eq!(config.timeout_ms, 2500);
        assert!(config.has_auth());
    }

    #[test]
    fn test_env_override_rejects_bad_values() {
        let mut config = RestConfig::default();
        let lookup = lookup_from(&[("UPSTREAM_TIMEOUT_MS", "soon")]);
        let err = config.apply_env_overrides(&lookup).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_MS"));

        let lookup = lookup_from(&[("TIMESTAMP_FORMAT", "iso8601")]);
        assert!(config.apply_env_overrides(&lookup).is_err());
    }

    #[test]
    fn test_validate() {
        let config = RestConfig::builder().base_url("not a url").build();
        assert!(config.validate().is_err());

        let config = RestConfig::builder().base_url("ftp://example.com").build();
        assert!(config.validate().is_err());

        let config = RestConfig::builder().timeout(Duration::ZERO).build();
        assert!(config.validate().is_err());

        let config = RestConfig::builder().product_type(" ").build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let builder = RestConfig::builder()
            .api_key("visible-key")
            .api_secret("hidden-secret")
            .passphrase("hidden-pass");
        let debug = format!("{builder:?}");
        assert!(debug.contains("visible-key"));
        assert!(!debug.contains("hidden-secret"));
        assert!(!debug.contains("hidden-pass"));

        let debug = format!("{:?}", builder.build());
        assert!(debug.contains("visible-key"));
        assert!(!debug.contains("hidden-secret"));
        assert!(!debug.contains("hidden-pass"));
    }

    #[test]
    fn test_builder_drops_empty_secrets() {
        let config = RestConfig::builder()
            .api_key("key")
            .api_secret("")
            .passphrase("pass")
            .build();
        assert!(config.api_secret.is_none());
        assert_eq!(config.passphrase.unwrap().expose_secret(), "pass");
    }
}
