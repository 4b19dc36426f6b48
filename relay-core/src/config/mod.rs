//! Configuration management module.
//!
//! - YAML, TOML and JSON configuration files
//! - Validation with descriptive error messages
//! - Environment variable overrides through an injected lookup
//!
//! # Example
//!
//! ```rust,ignore
//! use relay_core::config::{ConfigLoader, Configurable, Validatable};
//!
//! let mut config: ServerConfig = ConfigLoader::new().load_file("relay.yaml")?;
//! config.apply_env_overrides(&|name| std::env::var(name).ok())?;
//! config.validate()?;
//! ```

mod loader;
mod secret;
mod traits;

pub use loader::{ConfigFormat, ConfigLoader};
pub use secret::{deserialize_optional_secret, secret_from_env};
pub use traits::{Configurable, EnvLookup, Validatable, env_parse, env_string};
