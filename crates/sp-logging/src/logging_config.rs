// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Logging configuration types

use crate::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// Logging section of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    #[serde(rename = "log-level")]
    pub level: LogLevel,
    #[serde(rename = "log-format")]
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_keys() {
        let config: LoggingConfig =
            toml::from_str("log-level = \"debug\"\nlog-format = \"json\"\n").expect("toml");
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: LoggingConfig = toml::from_str("").expect("toml");
        assert_eq!(config, LoggingConfig::default());
    }
}
