// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server configuration

use serde::{Deserialize, Serialize};
use sp_logging::LoggingConfig;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Enable permissive CORS headers for development
    pub enable_cors: bool,

    /// Prefix of the page URLs handed out in redirects
    pub base_path: String,

    /// TOML fixture with the repositories and files to serve
    pub seed_file: Option<PathBuf>,

    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
            enable_cors: false,
            base_path: String::new(),
            seed_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load a configuration file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_logging::{LogFormat, LogLevel};
    use std::io::Write;

    #[test]
    fn server_config_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr, "127.0.0.1:3001".parse().unwrap());
        assert!(!config.enable_cors, "CORS must be opt-in");
        assert_eq!(config.base_path, "");
        assert_eq!(config.seed_file, None);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
bind-addr = "0.0.0.0:8080"
base-path = "/app"

[logging]
log-format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.base_path, "/app");
        assert!(!config.enable_cors);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enable-cors = true\nseed-file = \"fixtures/seed.toml\"").unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert!(config.enable_cors);
        assert_eq!(config.seed_file, Some(PathBuf::from("fixtures/seed.toml")));
    }

    #[test]
    fn unknown_bind_addr_is_rejected() {
        assert!(ServerConfig::from_toml("bind-addr = \"not an address\"").is_err());
    }
}
