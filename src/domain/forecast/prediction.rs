use crate::domain::ml::feature_registry::FeatureRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const FACTOR_SEASONAL_DEMAND: &str = "seasonal_demand";
pub const FACTOR_PRICE_TREND: &str = "price_trend";
pub const FACTOR_MARKET_VOLATILITY: &str = "market_volatility";
pub const FACTOR_SUPPLY_PRESSURE: &str = "supply_pressure";
pub const FACTOR_DEMAND_PRESSURE: &str = "demand_pressure";

/// Explanatory context attached to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionFactors {
    /// Seasonal demand multiplier for the target month.
    pub seasonal_demand: f64,
    /// Relative change over the trailing 30 prices.
    pub price_trend: f64,
    /// Coefficient of variation over the trailing 30 prices.
    pub market_volatility: f64,
    pub supply_pressure: f64,
    pub demand_pressure: f64,
}

impl PredictionFactors {
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (FACTOR_SEASONAL_DEMAND.to_string(), self.seasonal_demand),
            (FACTOR_PRICE_TREND.to_string(), self.price_trend),
            (FACTOR_MARKET_VOLATILITY.to_string(), self.market_volatility),
            (FACTOR_SUPPLY_PRESSURE.to_string(), self.supply_pressure),
            (FACTOR_DEMAND_PRESSURE.to_string(), self.demand_pressure),
        ])
    }
}

/// A single point forecast with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub commodity: String,
    /// Rounded to 2 decimal places.
    pub predicted_price: f64,
    /// Heuristic in [0.5, 0.95]; not a calibrated interval.
    pub confidence: f64,
    pub prediction_date: NaiveDate,
    pub factors: PredictionFactors,
    pub recommendation: String,
    /// Unscaled model input, kept for auditing lag and rolling inputs.
    pub inputs: FeatureRow,
    pub model_id: Uuid,
}

impl PricePrediction {
    pub fn factor_map(&self) -> BTreeMap<String, f64> {
        self.factors.as_map()
    }
}
