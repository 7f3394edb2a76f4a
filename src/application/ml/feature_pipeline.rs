//! Feature engineering shared by training and inference.
//!
//! Both paths go through [`history_features`], so a training row and a
//! prediction row for the same position are identical.

use crate::domain::market::price_series::PriceSeries;
use crate::domain::ml::feature_registry::{
    FeatureRow, LAG_MONTH, LAG_SHORT, LAG_WEEK, MA_LONG, MA_SHORT, MAX_LOOKBACK,
    PriceHistoryFeatures,
};
use chrono::NaiveDate;

/// Supervised table: one feature row and target price per valid position.
#[derive(Debug, Clone, Default)]
pub struct TrainingTable {
    pub rows: Vec<FeatureRow>,
    pub targets: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

impl TrainingTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(FeatureRow::to_vector).collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Lag and rolling-mean inputs from the observations preceding a target.
///
/// `history` is oldest first and must not include the target itself.
/// A lag longer than the history falls back to the history mean; rolling
/// windows are clipped to what is available. Returns `None` on empty history.
pub fn history_features(history: &[f64]) -> Option<PriceHistoryFeatures> {
    if history.is_empty() {
        return None;
    }
    let n = history.len();
    let lag = |k: usize| {
        if n >= k {
            history[n - k]
        } else {
            mean(history)
        }
    };
    let rolling = |w: usize| mean(&history[n.saturating_sub(w)..]);

    Some(PriceHistoryFeatures {
        lag_1: lag(LAG_SHORT),
        lag_7: lag(LAG_WEEK),
        lag_30: lag(LAG_MONTH),
        ma_7: rolling(MA_SHORT),
        ma_30: rolling(MA_LONG),
    })
}

/// Builds the training table from the canonical daily series.
///
/// Positions before `MAX_LOOKBACK` are dropped rather than padded.
pub fn build_training_table(series: &PriceSeries) -> TrainingTable {
    let daily = series.daily_prices();
    let prices: Vec<f64> = daily.iter().map(|d| d.price).collect();
    let mut table = TrainingTable::default();

    for i in MAX_LOOKBACK..daily.len() {
        let Some(history) = history_features(&prices[i - MAX_LOOKBACK..i]) else {
            continue;
        };
        table.rows.push(FeatureRow::new(daily[i].date, history));
        table.targets.push(prices[i]);
        table.dates.push(daily[i].date);
    }

    table
}

/// Number of valid rows `build_training_table` would produce.
pub fn valid_row_count(series: &PriceSeries) -> usize {
    series.daily_prices().len().saturating_sub(MAX_LOOKBACK)
}

/// Feature row for an arbitrary target date from the most recent prices.
pub fn build_prediction_row(tail: &[f64], target: NaiveDate) -> Option<FeatureRow> {
    let start = tail.len().saturating_sub(MAX_LOOKBACK);
    history_features(&tail[start..]).map(|h| FeatureRow::new(target, h))
}
