//! Loading helpers for secret configuration values.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use super::traits::{EnvLookup, env_string};

/// Deserializes an optional secret, treating an empty string as absent.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_optional_secret")]`.
pub fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|v| !v.is_empty()).map(SecretString::from))
}

/// Reads a secret from the environment, treating blank values as unset.
#[must_use]
pub fn secret_from_env(lookup: &EnvLookup<'_>, name: &str) -> Option<SecretString> {
    env_string(lookup, name).map(SecretString::from)
}
