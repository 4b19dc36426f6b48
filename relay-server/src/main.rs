//! # Relay Server
//!
//! Authenticated forwarding gateway to the Bitget REST API.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults and environment variables only
//! FWD_TOKEN=change-me API_KEY=... API_SECRET=... API_PASSPHRASE=... relay-server
//!
//! # Run with a configuration file
//! relay-server --config /etc/relay/relay.yaml
//!
//! # Check a configuration and exit
//! relay-server --config relay.yaml --validate
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use relay_core::config::Validatable;
use relay_server::{RelayConfig, RelayServer, shutdown_signal};

const DEFAULT_CONFIG_PATH: &str = "relay.yaml";

/// Relay gateway server
#[derive(Parser, Debug)]
#[command(name = "relay-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML, TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override server host
    #[arg(long)]
    host: Option<String>,

    /// Override server port
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args).context("Failed to load configuration")?;

    if args.validate {
        println!("Configuration is valid");
        return Ok(());
    }

    let server = RelayServer::new(config);
    server.init_logging()?;
    server.run(shutdown_signal()).await?;

    Ok(())
}

/// Loads the file, then applies environment and command-line overrides.
///
/// An explicit `--config` must exist; the default path is optional.
fn load_config(args: &Args) -> anyhow::Result<RelayConfig> {
    let (path, required) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let mut config = RelayConfig::load(&path, required)?;
    config.apply_process_env()?;

    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}
