use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Ordered list of feature names.
/// This order MUST match the order of `FeatureRow::to_vector`.
/// Any change here is a breaking change for stored model artifacts.
pub const FEATURE_NAMES: &[&str] = &[
    "year",
    "month",
    "day",
    "dayofyear",
    "weekday",
    "quarter",
    "sin_dayofyear",
    "cos_dayofyear",
    "price_lag_1",
    "price_lag_7",
    "price_lag_30",
    "price_ma_7",
    "price_ma_30",
];

pub const FEATURE_COUNT: usize = 13;

/// Lags, in observations, used as features.
pub const LAG_SHORT: usize = 1;
pub const LAG_WEEK: usize = 7;
pub const LAG_MONTH: usize = 30;

/// Rolling-mean windows, in observations.
pub const MA_SHORT: usize = 7;
pub const MA_LONG: usize = 30;

/// Longest look-back any feature needs. Rows before this index are dropped.
pub const MAX_LOOKBACK: usize = 30;

/// Price history inputs of one feature row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryFeatures {
    pub lag_1: f64,
    pub lag_7: f64,
    pub lag_30: f64,
    pub ma_7: f64,
    pub ma_30: f64,
}

/// Model input for one target date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_year: u32,
    /// Monday = 0
    pub weekday: u32,
    pub quarter: u32,
    pub sin_day_of_year: f64,
    pub cos_day_of_year: f64,
    pub lag_1: f64,
    pub lag_7: f64,
    pub lag_30: f64,
    pub ma_7: f64,
    pub ma_30: f64,
}

impl FeatureRow {
    pub fn new(date: NaiveDate, history: PriceHistoryFeatures) -> Self {
        let day_of_year = date.ordinal();
        let angle = 2.0 * PI * day_of_year as f64 / 365.0;
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_year,
            weekday: date.weekday().num_days_from_monday(),
            quarter: (date.month() - 1) / 3 + 1,
            sin_day_of_year: angle.sin(),
            cos_day_of_year: angle.cos(),
            lag_1: history.lag_1,
            lag_7: history.lag_7,
            lag_30: history.lag_30,
            ma_7: history.ma_7,
            ma_30: history.ma_30,
        }
    }

    /// Feature values in `FEATURE_NAMES` order.
    pub fn to_vector(&self) -> Vec<f64> {
        vec![
            self.year as f64,
            self.month as f64,
            self.day as f64,
            self.day_of_year as f64,
            self.weekday as f64,
            self.quarter as f64,
            self.sin_day_of_year,
            self.cos_day_of_year,
            self.lag_1,
            self.lag_7,
            self.lag_30,
            self.ma_7,
            self.ma_30,
        ]
    }
}

/// Current feature names as owned strings, for embedding in artifacts.
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}
