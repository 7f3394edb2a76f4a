//! Forecasting service: the composition root of the engine.
//!
//! Owns the series store, model registry, trainer, prediction engine, clock
//! and indicator source. `ForecastService` is `Send + Sync`; share it behind
//! an `Arc` to serve predictions from several threads while retraining.

use crate::application::forecasting::factors::FactorAnalyzer;
use crate::application::forecasting::forecaster::{CancellationFlag, ForecastIter};
use crate::application::forecasting::insights::build_insights;
use crate::application::forecasting::predictor::PredictionEngine;
use crate::application::ml::registry::ModelRegistry;
use crate::application::ml::trainer::{ModelTrainer, SeriesTrainer, TrainOutcome, TrainedModel};
use crate::config::Config;
use crate::domain::config::{ForecastConfig, ForecastMode, TrainingConfig};
use crate::domain::errors::{ForecastError, Result};
use crate::domain::forecast::insights::MarketInsights;
use crate::domain::forecast::prediction::PricePrediction;
use crate::domain::market::price_series::{PricePoint, PriceSeries};
use crate::domain::ml::feature_registry::MAX_LOOKBACK;
use crate::domain::ports::{Clock, IndicatorSource};
use crate::domain::repositories::SeriesRepository;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::persistence::model_store::ModelStore;
use crate::infrastructure::repositories::in_memory::InMemorySeriesRepository;
use crate::infrastructure::simulation::indicators::{NeutralIndicators, RandomIndicators};
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct ForecastService {
    store: Arc<dyn SeriesRepository>,
    registry: ModelRegistry,
    trainer: Arc<dyn SeriesTrainer>,
    engine: PredictionEngine,
    clock: Arc<dyn Clock>,
    indicators: Arc<dyn IndicatorSource>,
    forecast_config: ForecastConfig,
}

impl ForecastService {
    /// Service over `store` with the system clock. Indicators follow
    /// `forecast_config.random_indicators`.
    pub fn new(
        store: Arc<dyn SeriesRepository>,
        training: TrainingConfig,
        forecast_config: ForecastConfig,
    ) -> Self {
        let indicators: Arc<dyn IndicatorSource> = if forecast_config.random_indicators {
            Arc::new(RandomIndicators::new())
        } else {
            Arc::new(NeutralIndicators)
        };
        let engine = Self::build_engine(&forecast_config, indicators.clone());
        Self {
            store,
            registry: ModelRegistry::new(),
            trainer: Arc::new(ModelTrainer::new(training)),
            engine,
            clock: Arc::new(SystemClock),
            indicators,
            forecast_config,
        }
    }

    /// Service with an empty in-memory store.
    pub fn in_memory(training: TrainingConfig, forecast_config: ForecastConfig) -> Self {
        Self::new(
            Arc::new(InMemorySeriesRepository::new()),
            training,
            forecast_config,
        )
    }

    pub fn from_config(config: &Config, store: Arc<dyn SeriesRepository>) -> Self {
        Self::new(store, config.training.clone(), config.forecast.clone())
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_trainer(mut self, trainer: Arc<dyn SeriesTrainer>) -> Self {
        self.trainer = trainer;
        self
    }

    pub fn with_indicators(mut self, indicators: Arc<dyn IndicatorSource>) -> Self {
        self.engine = Self::build_engine(&self.forecast_config, indicators.clone());
        self.indicators = indicators;
        self
    }

    fn build_engine(config: &ForecastConfig, indicators: Arc<dyn IndicatorSource>) -> PredictionEngine {
        let analyzer = FactorAnalyzer::new(config.calendar.clone(), indicators);
        PredictionEngine::new(analyzer, config.thresholds)
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn forecast_config(&self) -> &ForecastConfig {
        &self.forecast_config
    }

    pub fn indicator_source(&self) -> &str {
        self.indicators.name()
    }

    pub fn model(&self, commodity: &str) -> Option<Arc<TrainedModel>> {
        self.registry.get(commodity)
    }

    // --- Series store ---

    pub fn get_series(&self, commodity: &str) -> Result<Arc<PriceSeries>> {
        self.store.get_series(commodity)
    }

    pub fn append(&self, commodity: &str, point: PricePoint) -> Result<()> {
        self.store.append(commodity, point)
    }

    pub fn replace_series(&self, commodity: &str, points: Vec<PricePoint>) -> Result<()> {
        self.store.replace_series(commodity, points)
    }

    pub fn commodities(&self) -> Vec<String> {
        self.store.commodities()
    }

    // --- Training ---

    /// Trains and publishes a model for one commodity.
    ///
    /// Too little history is not an error: the outcome is `Skipped` and any
    /// model published earlier for the commodity is withdrawn.
    /// Other failures leave the published model in place.
    pub fn train(&self, commodity: &str) -> Result<TrainOutcome> {
        let series = self.store.get_series(commodity)?;
        match self.trainer.train(&series) {
            Ok(model) => {
                let report = model.report();
                self.registry.publish(model);
                Ok(TrainOutcome::Trained(report))
            }
            Err(ForecastError::InsufficientHistory {
                commodity,
                rows,
                required,
            }) => {
                warn!(
                    "Skipping {}: {} feature rows < {} required",
                    commodity, rows, required
                );
                if self.registry.remove(&commodity).is_some() {
                    info!("Withdrew the previous {} model", commodity);
                }
                Ok(TrainOutcome::Skipped {
                    commodity,
                    rows,
                    required,
                })
            }
            Err(e) => {
                error!("Training failed for {}: {}", commodity, e);
                Err(e)
            }
        }
    }

    /// Trains every commodity in parallel. One commodity failing never
    /// affects the others.
    pub fn train_all(&self) -> BTreeMap<String, Result<TrainOutcome>> {
        let outcomes: BTreeMap<String, Result<TrainOutcome>> = self
            .commodities()
            .into_par_iter()
            .map(|commodity| {
                let outcome = self.train(&commodity);
                (commodity, outcome)
            })
            .collect();

        let trained = outcomes
            .values()
            .filter(|o| matches!(o, Ok(TrainOutcome::Trained(_))))
            .count();
        let skipped = outcomes
            .values()
            .filter(|o| matches!(o, Ok(TrainOutcome::Skipped { .. })))
            .count();
        info!(
            "Training complete: {} trained, {} skipped, {} failed",
            trained,
            skipped,
            outcomes.len() - trained - skipped
        );
        outcomes
    }

    // --- Prediction ---

    /// Predicts one day. `date` defaults to tomorrow per the clock.
    pub fn predict(&self, commodity: &str, date: Option<NaiveDate>) -> Result<PricePrediction> {
        let series = self.store.get_series(commodity)?;
        let model = self
            .registry
            .get(commodity)
            .ok_or_else(|| ForecastError::model_unavailable(commodity))?;
        let target = date.unwrap_or_else(|| self.clock.tomorrow());

        if let Some(last) = series.last_date() {
            if target > last {
                debug!(
                    "{}: predicting {} which is {} days past the last observation",
                    commodity,
                    target,
                    (target - last).num_days()
                );
            }
        }

        self.engine.predict(
            &model,
            &series.tail(MAX_LOOKBACK),
            series.daily_prices().len(),
            target,
        )
    }

    /// `days` predictions starting tomorrow, in the configured mode.
    pub fn forecast(&self, commodity: &str, days: usize) -> Result<Vec<PricePrediction>> {
        self.forecast_iter(commodity, days, self.forecast_config.mode, None)?
            .collect()
    }

    /// Lazy forecast. The model snapshot is taken now; later retraining
    /// does not affect this sequence.
    pub fn forecast_iter(
        &self,
        commodity: &str,
        days: usize,
        mode: ForecastMode,
        cancel: Option<CancellationFlag>,
    ) -> Result<ForecastIter<'_>> {
        if days < 1 {
            return Err(ForecastError::invalid("days must be at least 1"));
        }
        let series = self.store.get_series(commodity)?;
        let model = self
            .registry
            .get(commodity)
            .ok_or_else(|| ForecastError::model_unavailable(commodity))?;

        ForecastIter::new(
            &self.engine,
            model,
            series.tail(MAX_LOOKBACK),
            series.daily_prices().len(),
            self.clock.tomorrow(),
            days,
            mode,
            cancel,
        )
    }

    // --- Insights ---

    /// Market report for one commodity, or for every known commodity.
    pub fn insights(&self, commodity: Option<&str>) -> Result<MarketInsights> {
        let series: Vec<Arc<PriceSeries>> = match commodity {
            Some(c) => vec![self.store.get_series(c)?],
            None => self
                .commodities()
                .iter()
                .filter_map(|c| self.store.get_series(c).ok())
                .collect(),
        };
        let month = self.clock.today().month();
        Ok(build_insights(series.iter().map(|s| s.as_ref()), month))
    }

    // --- Persistence ---

    /// Writes every published model; returns how many were saved.
    pub fn save(&self, path: &Path) -> Result<usize> {
        ModelStore::new(path).save(&self.registry.snapshot())
    }

    /// Replaces the registry with the models in `path`. On any error the
    /// current models keep serving.
    pub fn load(&self, path: &Path) -> Result<usize> {
        let models = ModelStore::new(path).load()?;
        let count = models.len();
        self.registry.replace_all(models);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::Duration;

    fn service() -> ForecastService {
        ForecastService::in_memory(TrainingConfig::lightweight(), ForecastConfig::default())
            .with_clock(Arc::new(FixedClock(
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            )))
    }

    fn load(service: &ForecastService, commodity: &str, days: i64) {
        let start = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap() - Duration::days(days - 1);
        let points = (0..days)
            .map(|i| {
                PricePoint::new(commodity, start + Duration::days(i), 80.0 + (i % 12) as f64)
            })
            .collect();
        service.replace_series(commodity, points).unwrap();
    }

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForecastService>();
    }

    #[test]
    fn test_unknown_commodity() {
        let service = service();
        assert!(matches!(
            service.predict("Vanilla", None).unwrap_err(),
            ForecastError::UnknownCommodity { .. }
        ));
        assert!(matches!(
            service.train("Vanilla").unwrap_err(),
            ForecastError::UnknownCommodity { .. }
        ));
        assert!(service.insights(Some("Vanilla")).is_err());
    }

    #[test]
    fn test_skip_withdraws_previous_model() {
        let service = service();
        load(&service, "Ginger", 200);
        assert!(service.train("Ginger").unwrap().is_trained());
        assert!(service.predict("Ginger", None).is_ok());

        load(&service, "Ginger", 50);
        let outcome = service.train("Ginger").unwrap();
        assert!(matches!(outcome, TrainOutcome::Skipped { rows: 20, .. }));
        assert!(service.model("Ginger").is_none());
        assert!(matches!(
            service.predict("Ginger", None).unwrap_err(),
            ForecastError::ModelUnavailable { .. }
        ));
    }

    #[test]
    fn test_rejected_append_does_not_register_commodity() {
        let service = service();
        let bad = PricePoint::new("Vanilla", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), -5.0);
        assert!(service.append("Vanilla", bad).is_err());

        assert!(service.commodities().is_empty());
        assert!(matches!(
            service.train("Vanilla").unwrap_err(),
            ForecastError::UnknownCommodity { .. }
        ));
        assert!(matches!(
            service.predict("Vanilla", None).unwrap_err(),
            ForecastError::UnknownCommodity { .. }
        ));
    }

    #[test]
    fn test_predict_defaults_to_tomorrow() {
        let service = service();
        load(&service, "Ginger", 200);
        service.train("Ginger").unwrap();

        let p = service.predict("Ginger", None).unwrap();
        assert_eq!(p.prediction_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        // July is a low-demand month in the default calendar.
        assert_eq!(p.factors.seasonal_demand, 0.8);
    }

    #[test]
    fn test_forecast_rejects_zero_days_first() {
        let service = service();
        assert!(matches!(
            service.forecast("Vanilla", 0).unwrap_err(),
            ForecastError::InvalidParameter { .. }
        ));
    }
}
