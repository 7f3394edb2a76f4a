use crate::domain::market::seasonal_calendar::SeasonalCalendar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How multi-day forecasts build features for day 2 onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForecastMode {
    /// Each predicted price is appended to a working tail before the next day.
    #[default]
    Autoregressive,
    /// Every day re-reads the same observed tail. Only day 1 is a true forecast.
    Naive,
}

impl FromStr for ForecastMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "autoregressive" | "strict" => Ok(ForecastMode::Autoregressive),
            "naive" => Ok(ForecastMode::Naive),
            other => Err(format!(
                "Invalid forecast mode: {}. Must be 'autoregressive' or 'naive'",
                other
            )),
        }
    }
}

impl fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastMode::Autoregressive => write!(f, "autoregressive"),
            ForecastMode::Naive => write!(f, "naive"),
        }
    }
}

/// Cut-offs used when turning factors into advice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub trend_up: f64,
    pub trend_down: f64,
    pub seasonal_high: f64,
    pub seasonal_low: f64,
    pub high_volatility: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            trend_up: 0.1,
            trend_down: -0.1,
            seasonal_high: 1.1,
            seasonal_low: 0.9,
            high_volatility: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub mode: ForecastMode,
    pub default_days: usize,
    /// Use jittered supply/demand/confidence instead of the neutral source.
    pub random_indicators: bool,
    pub thresholds: RecommendationThresholds,
    pub calendar: SeasonalCalendar,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            mode: ForecastMode::Autoregressive,
            default_days: 7,
            random_indicators: false,
            thresholds: RecommendationThresholds::default(),
            calendar: SeasonalCalendar::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_mode_parsing() {
        assert_eq!(
            ForecastMode::from_str("naive").unwrap(),
            ForecastMode::Naive
        );
        assert_eq!(
            ForecastMode::from_str(" Strict ").unwrap(),
            ForecastMode::Autoregressive
        );
        assert!(ForecastMode::from_str("recursive-ish").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.mode, ForecastMode::Autoregressive);
        assert_eq!(config.default_days, 7);
        assert!(!config.random_indicators);
        assert_eq!(config.thresholds.high_volatility, 0.2);
    }
}
