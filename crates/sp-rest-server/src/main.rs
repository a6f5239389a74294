// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Sapphire repository settings server binary

use clap::Parser;
use sp_logging::{LogFormat, LogLevel};
use sp_rest_server::{Server, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to load before applying command-line overrides
    #[arg(short, long, env = "SAPPHIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address for the server
    #[arg(short, long, env = "SAPPHIRE_BIND")]
    bind: Option<SocketAddr>,

    /// Enable CORS for development
    #[arg(long, env = "SAPPHIRE_CORS")]
    cors: bool,

    /// Prefix of the page URLs returned in redirects
    #[arg(long, env = "SAPPHIRE_BASE_PATH")]
    base_path: Option<String>,

    /// TOML fixture with repositories to serve
    #[arg(long, env = "SAPPHIRE_SEED")]
    seed: Option<PathBuf>,

    /// Log level
    #[arg(short, long, env = "SAPPHIRE_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long, env = "SAPPHIRE_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        config.enable_cors |= self.cors;
        if let Some(base_path) = self.base_path {
            config.base_path = base_path;
        }
        if let Some(seed) = self.seed {
            config.seed_file = Some(seed);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    sp_logging::init_from_config("sp-rest-server", &config.logging)?;

    tracing::info!("Starting Sapphire repository settings server");

    let server = Server::new(config).await?;
    server.run().await?;

    Ok(())
}
