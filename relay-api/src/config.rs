//! API server configuration.
//!
//! Binding address and the shared caller token checked by the gate.

use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;

use relay_core::config::{
    Configurable, EnvLookup, Validatable, deserialize_optional_secret, env_parse, env_string,
    secret_from_env,
};
use relay_core::error::ConfigError;

/// API server configuration.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Token every protected route expects from the caller.
    ///
    /// When unset the gate rejects every protected request.
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub caller_token: Option<SecretString>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            caller_token: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("caller_token", &self.caller_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ApiConfig {
    /// Returns the server bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns whether a caller token is configured.
    #[must_use]
    pub fn has_caller_token(&self) -> bool {
        self.caller_token.is_some()
    }
}

impl Validatable for ApiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::missing_field_in_section("host", "server"));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid_value("server.port", "Port cannot be 0"));
        }
        Ok(())
    }
}

impl Configurable for ApiConfig {
    fn apply_env_overrides(&mut self, lookup: &EnvLookup<'_>) -> Result<(), ConfigError> {
        if let Some(host) = env_string(lookup, "HOST") {
            self.host = host;
        }
        if let Some(port) = env_parse::<u16>(lookup, "PORT")? {
            self.port = port;
        }
        if let Some(token) = secret_from_env(lookup, "FWD_TOKEN") {
            self.caller_token = Some(token);
        }
        Ok(())
    }

    fn env_var_names() -> Vec<&'static str> {
        vec!["HOST", "PORT", "FWD_TOKEN"]
    }
}
