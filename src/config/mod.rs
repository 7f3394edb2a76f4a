//! Configuration module for cropcast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Training, Forecasting and Observability.
//!
//! Every loader takes a key lookup instead of reading `std::env` directly, so
//! tests can supply a map without touching the process environment.

mod forecast_env_config;
mod observability_config;
mod training_env_config;

pub use forecast_env_config::{calendar_from_lookup, forecast_from_lookup};
pub use observability_config::{LogFormat, ObservabilityEnvConfig};
pub use training_env_config::training_from_lookup;

use crate::domain::config::{ForecastConfig, TrainingConfig};
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Environment-style key lookup.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn parse_or<T>(lookup: Lookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub training: TrainingConfig,
    pub forecast: ForecastConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        Ok(Self {
            training: training_from_lookup(lookup).context("Failed to load training config")?,
            forecast: forecast_from_lookup(lookup).context("Failed to load forecast config")?,
            observability: ObservabilityEnvConfig::from_lookup(lookup),
        })
    }
}
