//! Observability configuration parsing from environment variables.
//!
//! This module handles the log filter and output format.

use super::Lookup;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid LOG_FORMAT: {}. Must be 'text' or 'json'", s),
        }
    }
}

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityEnvConfig {
    /// `EnvFilter` directive; `RUST_LOG` still takes precedence when set.
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl ObservabilityEnvConfig {
    /// Unknown formats fall back to text rather than failing startup.
    pub fn from_lookup(lookup: Lookup<'_>) -> Self {
        Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: lookup("LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::from_lookup(&|_| None);
        assert_eq!(config, ObservabilityEnvConfig::default());
    }

    #[test]
    fn test_json_format() {
        let config = ObservabilityEnvConfig::from_lookup(&|key| match key {
            "LOG_FORMAT" => Some("JSON".to_string()),
            "LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "debug");
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
