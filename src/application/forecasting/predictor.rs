use super::factors::FactorAnalyzer;
use super::recommendation::recommend;
use crate::application::ml::feature_pipeline::build_prediction_row;
use crate::application::ml::trainer::TrainedModel;
use crate::domain::config::RecommendationThresholds;
use crate::domain::errors::{ForecastError, Result};
use crate::domain::forecast::prediction::PricePrediction;
use chrono::NaiveDate;
use tracing::debug;

pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Turns a trained model and a price tail into an explained prediction.
pub struct PredictionEngine {
    analyzer: FactorAnalyzer,
    thresholds: RecommendationThresholds,
}

impl PredictionEngine {
    pub fn new(analyzer: FactorAnalyzer, thresholds: RecommendationThresholds) -> Self {
        Self {
            analyzer,
            thresholds,
        }
    }

    pub fn analyzer(&self) -> &FactorAnalyzer {
        &self.analyzer
    }

    /// Predicts the price on `target`.
    ///
    /// `tail` holds the most recent canonical prices, oldest first; only the
    /// last 30 are used. `series_len` is the full history length and only
    /// drives confidence.
    pub fn predict(
        &self,
        model: &TrainedModel,
        tail: &[f64],
        series_len: usize,
        target: NaiveDate,
    ) -> Result<PricePrediction> {
        let commodity = model.commodity.as_str();
        let inputs = build_prediction_row(tail, target).ok_or_else(|| {
            ForecastError::invalid(format!("no price history to predict {}", commodity))
        })?;

        let raw = model.predict_raw(&inputs.to_vector())?;
        if !raw.is_finite() {
            return Err(ForecastError::training(
                commodity,
                format!("model produced non-finite output {}", raw),
            ));
        }
        let predicted_price = round_price(raw);

        let factors = self.analyzer.analyze(commodity, target, tail);
        let confidence = self.analyzer.confidence(commodity, series_len);
        let recommendation = recommend(&factors, &self.thresholds);

        debug!(
            "{} {} on {}: {:.2} (confidence {:.2})",
            model.algorithm, commodity, target, predicted_price, confidence
        );

        Ok(PricePrediction {
            commodity: commodity.to_string(),
            predicted_price,
            confidence,
            prediction_date: target,
            factors,
            recommendation,
            inputs,
            model_id: model.model_id,
        })
    }
}
