//! Logging configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use relay_core::config::{Configurable, EnvLookup, Validatable, env_parse, env_string};
use relay_core::error::ConfigError;

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter directive (e.g., "info", "debug", "relay_api=trace")
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Include thread IDs in log output
    #[serde(default)]
    pub include_thread_id: bool,

    /// Include file and line information
    #[serde(default)]
    pub include_file_info: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            include_thread_id: false,
            include_file_info: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Validatable for LogConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))
    }
}

impl Configurable for LogConfig {
    fn apply_env_overrides(&mut self, lookup: &EnvLookup<'_>) -> Result<(), ConfigError> {
        if let Some(level) = env_string(lookup, "LOG_LEVEL") {
            self.level = level;
        }
        if let Some(format) = env_parse::<LogFormat>(lookup, "LOG_FORMAT")? {
            self.format = format;
        }
        Ok(())
    }

    fn env_var_names() -> Vec<&'static str> {
        vec!["LOG_LEVEL", "LOG_FORMAT"]
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format for log aggregation systems
    #[default]
    Json,
    /// Human-readable format for development
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format `{other}`; expected json|pretty")),
        }
    }
}
