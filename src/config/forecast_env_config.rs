//! Forecasting configuration parsing from environment variables.
//!
//! Forecast mode, default horizon, indicator source and the seasonal demand
//! calendar (either from `SEASON_*` variables or a TOML file).

use super::{Lookup, parse_or};
use crate::domain::config::{ForecastConfig, ForecastMode};
use crate::domain::market::seasonal_calendar::{SeasonBuckets, SeasonalCalendar};
use anyhow::{Context, Result, anyhow};
use std::fs;

fn parse_months(raw: &str, key: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("Failed to parse {}: '{}' is not a month", key, s))
        })
        .collect()
}

/// Seasonal calendar. `SEASONAL_CALENDAR_FILE`, when set, replaces the
/// `SEASON_*` variables entirely.
pub fn calendar_from_lookup(lookup: Lookup<'_>) -> Result<SeasonalCalendar> {
    if let Some(path) = lookup("SEASONAL_CALENDAR_FILE") {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read seasonal calendar file {}", path))?;
        return SeasonalCalendar::from_toml_str(&content)
            .map_err(|e| anyhow!("Invalid seasonal calendar file {}: {}", path, e));
    }

    let d = SeasonBuckets::default();
    let buckets = SeasonBuckets {
        low_months: match lookup("SEASON_LOW_MONTHS") {
            Some(raw) => parse_months(&raw, "SEASON_LOW_MONTHS")?,
            None => d.low_months,
        },
        high_months: match lookup("SEASON_HIGH_MONTHS") {
            Some(raw) => parse_months(&raw, "SEASON_HIGH_MONTHS")?,
            None => d.high_months,
        },
        low_multiplier: parse_or(lookup, "SEASON_LOW_MULTIPLIER", d.low_multiplier)?,
        high_multiplier: parse_or(lookup, "SEASON_HIGH_MULTIPLIER", d.high_multiplier)?,
        neutral_multiplier: d.neutral_multiplier,
    };

    let calendar = SeasonalCalendar::new(buckets);
    calendar
        .validate()
        .map_err(|e| anyhow!("Invalid seasonal calendar: {}", e))?;
    Ok(calendar)
}

pub fn forecast_from_lookup(lookup: Lookup<'_>) -> Result<ForecastConfig> {
    let d = ForecastConfig::default();

    let mode = match lookup("FORECAST_MODE") {
        Some(raw) => raw
            .parse::<ForecastMode>()
            .map_err(|e| anyhow!("Failed to parse FORECAST_MODE: {}", e))?,
        None => d.mode,
    };

    let default_days = parse_or(lookup, "FORECAST_DEFAULT_DAYS", d.default_days)?;
    if default_days == 0 {
        anyhow::bail!("FORECAST_DEFAULT_DAYS must be at least 1");
    }

    Ok(ForecastConfig {
        mode,
        default_days,
        random_indicators: parse_or(lookup, "RANDOM_INDICATORS", d.random_indicators)?,
        thresholds: d.thresholds,
        calendar: calendar_from_lookup(lookup)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = forecast_from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(config, ForecastConfig::default());
    }

    #[test]
    fn test_mode_and_days() {
        let config = forecast_from_lookup(&lookup_from(&[
            ("FORECAST_MODE", "naive"),
            ("FORECAST_DEFAULT_DAYS", "14"),
            ("RANDOM_INDICATORS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.mode, ForecastMode::Naive);
        assert_eq!(config.default_days, 14);
        assert!(config.random_indicators);

        assert!(forecast_from_lookup(&lookup_from(&[("FORECAST_DEFAULT_DAYS", "0")])).is_err());
        assert!(forecast_from_lookup(&lookup_from(&[("FORECAST_MODE", "psychic")])).is_err());
    }

    #[test]
    fn test_season_months_from_env() {
        let calendar = calendar_from_lookup(&lookup_from(&[
            ("SEASON_LOW_MONTHS", "3, 4"),
            ("SEASON_HIGH_MONTHS", "12"),
            ("SEASON_HIGH_MULTIPLIER", "1.5"),
        ]))
        .unwrap();
        assert_eq!(calendar.default.low_months, vec![3, 4]);
        assert_eq!(calendar.default.high_multiplier, 1.5);

        let overlapping = lookup_from(&[("SEASON_LOW_MONTHS", "1"), ("SEASON_HIGH_MONTHS", "1")]);
        assert!(calendar_from_lookup(&overlapping).is_err());
        assert!(calendar_from_lookup(&lookup_from(&[("SEASON_LOW_MONTHS", "June")])).is_err());
    }

    #[test]
    fn test_missing_calendar_file_is_error() {
        let lookup = lookup_from(&[("SEASONAL_CALENDAR_FILE", "/nonexistent/cropcast/calendar.toml")]);
        assert!(calendar_from_lookup(&lookup).is_err());
    }
}
