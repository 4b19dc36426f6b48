//! Exchange API credentials.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// API key, secret and passphrase for one exchange account.
///
/// Only constructed when all three parts are configured; a gateway
/// without credentials refuses signed routes instead of sending
/// unsigned requests.
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
    passphrase: SecretString,
}

impl Credentials {
    /// Creates a new credentials bundle.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        api_secret: SecretString,
        passphrase: SecretString,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
            passphrase,
        }
    }

    /// Returns the API key sent as `ACCESS-KEY`.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the HMAC key.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Returns the passphrase sent as `ACCESS-PASSPHRASE`.
    #[must_use]
    pub fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}
