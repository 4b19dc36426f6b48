//! Configuration traits for validation and environment overrides.

use std::str::FromStr;

use crate::error::ConfigError;

/// Variable lookup used when applying environment overrides.
///
/// Production code passes a closure over `std::env::var`; tests pass a map.
pub type EnvLookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Trait for types that can be validated.
///
/// # Example
///
/// ```rust
/// use relay_core::config::Validatable;
/// use relay_core::error::ConfigError;
///
/// struct ListenConfig {
///     port: u16,
/// }
///
/// impl Validatable for ListenConfig {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.port == 0 {
///             return Err(ConfigError::invalid_value("port", "Port cannot be 0"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Trait for types that support environment variable overrides.
pub trait Configurable {
    /// Applies overrides read through `lookup`.
    ///
    /// Values that are present but unparsable are reported, never ignored.
    fn apply_env_overrides(&mut self, lookup: &EnvLookup<'_>) -> Result<(), ConfigError>;

    /// Returns the environment variable names this type reads.
    fn env_var_names() -> Vec<&'static str>;
}

/// Reads a variable, treating empty values as unset.
#[must_use]
pub fn env_string(lookup: &EnvLookup<'_>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

/// Reads and parses a variable.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if the value is present but does not parse.
pub fn env_parse<T>(lookup: &EnvLookup<'_>, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(lookup, name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid_env(name, e.to_string()))
        })
        .transpose()
}
