use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub current_price: f64,
    pub average_price: f64,
    pub price_change_percent: f64,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Upward,
    Downward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub direction: TrendDirection,
    /// Absolute least-squares slope over the last 30 prices, per day.
    pub strength: f64,
    /// Sample standard deviation of the whole series.
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPattern {
    pub peak_month: u32,
    pub low_month: u32,
    /// (max - min) / mean of the monthly averages, in percent.
    pub seasonal_variation: f64,
}

/// Cross-commodity market report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketInsights {
    pub market_overview: BTreeMap<String, MarketOverview>,
    pub price_trends: BTreeMap<String, PriceTrend>,
    pub seasonal_patterns: BTreeMap<String, SeasonalPattern>,
    pub recommendations: Vec<String>,
}
