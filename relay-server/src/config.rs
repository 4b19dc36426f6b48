//! Server configuration module.
//!
//! One file holds every section; environment variables override it and the
//! command line overrides both.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 3000
//!   caller_token: change-me
//! exchange:
//!   api_key: bg_xxx
//!   api_secret: xxx
//!   passphrase: xxx
//!   product_type: umcbl
//! logging:
//!   level: info
//!   format: json
//! ```

use serde::Deserialize;
use std::path::Path;

use relay_api::ApiConfig;
use relay_core::config::{ConfigLoader, Configurable, EnvLookup, Validatable};
use relay_core::error::ConfigError;
use relay_gateway::rest::RestConfig;
use relay_telemetry::logging::LogConfig;

/// Complete relay configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Inbound HTTP server.
    #[serde(default)]
    pub server: ApiConfig,

    /// Exchange client and credentials.
    #[serde(default)]
    pub exchange: RestConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LogConfig,
}

impl RelayConfig {
    /// Loads a configuration file. A missing optional file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if `required` is set and the file does not exist.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !path.exists() {
            if required {
                return Err(ConfigError::FileReadError {
                    path: path.display().to_string(),
                    reason: "file not found".to_string(),
                });
            }
            return Ok(Self::default());
        }
        ConfigLoader::new().load_file(path)
    }

    /// Applies overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_overrides(&|name| std::env::var(name).ok())
    }
}

impl Validatable for RelayConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.exchange.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Configurable for RelayConfig {
    fn apply_env_overrides(&mut self, lookup: &EnvLookup<'_>) -> Result<(), ConfigError> {
        self.server.apply_env_overrides(lookup)?;
        self.exchange.apply_env_overrides(lookup)?;
        self.logging.apply_env_overrides(lookup)?;
        Ok(())
    }

    fn env_var_names() -> Vec<&'static str> {
        let mut names = ApiConfig::env_var_names();
        names.extend(RestConfig::env_var_names());
        names.extend(LogConfig::env_var_names());
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::config::ConfigFormat;
    use relay_core::types::TimestampFormat;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3000);
        assert!(!config.exchange.has_auth());
    }

    #[test]
    fn test_load_yaml() {
        let yaml = r"
server:
  port: 8080
  caller_token: tok
exchange:
  api_key: key
  api_secret: secret
  passphrase: pass
  timestamp_format: seconds
logging:
  level: debug
  format: pretty
";
        let config: RelayConfig = ConfigLoader::new()
            .load_str(yaml, ConfigFormat::Yaml)
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.server.caller_token.as_ref().unwrap().expose_secret(),
            "tok"
        );
        assert!(config.exchange.has_auth());
        assert_eq!(config.exchange.timestamp_format, TimestampFormat::Seconds);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<RelayConfig, _> =
            ConfigLoader::new().load_str("servre:\n  port: 1\n", ConfigFormat::Yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_every_section() {
        let mut config = RelayConfig::default();
        config
            .apply_env_overrides(&lookup(&[
                ("PORT", "4000"),
                ("FWD_TOKEN", "tok"),
                ("API_KEY", "key"),
                ("API_SECRET", "secret"),
                ("API_PASSPHRASE", "pass"),
                ("API_BASE", "http://127.0.0.1:9999"),
                ("LOG_LEVEL", "warn"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 4000);
        assert!(config.server.has_caller_token());
        assert!(config.exchange.has_auth());
        assert_eq!(config.exchange.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_numeric_env_rejected() {
        let mut config = RelayConfig::default();
        assert!(
            config
                .apply_env_overrides(&lookup(&[("UPSTREAM_TIMEOUT_MS", "soon")]))
                .is_err()
        );
    }

    #[test]
    fn test_invalid_sections_fail_validation() {
        let mut config = RelayConfig::default();
        config.exchange.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = RelayConfig::default();
        config.logging.level = "relay=[".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/relay.yaml");
        assert!(RelayConfig::load(path, false).is_ok());
        assert!(RelayConfig::load(path, true).is_err());
    }

    #[test]
    fn test_env_var_names() {
        let names = RelayConfig::env_var_names();
        for name in ["FWD_TOKEN", "API_SECRET", "TIMESTAMP_FORMAT", "LOG_FORMAT"] {
            assert!(names.contains(&name), "{name}");
        }
    }
}
