//! Model training and selection.
//!
//! Builds the feature table for one commodity, splits it, fits every
//! candidate in [`EVALUATION_ORDER`] on standardised rows and keeps the one
//! with the highest held-out R².

use super::candidates::{EVALUATION_ORDER, ModelKind, Regressor};
use super::feature_pipeline::{TrainingTable, build_training_table};
use crate::domain::config::{SplitMode, TrainingConfig};
use crate::domain::errors::{ForecastError, Result};
use crate::domain::market::price_series::PriceSeries;
use crate::domain::ml::feature_registry::feature_names;
use crate::domain::ml::metrics::RegressionMetrics;
use crate::domain::ml::scaler::StandardScaler;
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outcome of one candidate on the held-out rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub algorithm: ModelKind,
    /// `None` when the candidate failed to fit or predict.
    pub metrics: Option<RegressionMetrics>,
    pub error: Option<String>,
}

impl CandidateScore {
    pub fn r2(&self) -> Option<f64> {
        self.metrics.map(|m| m.r2)
    }
}

/// Selected model for one commodity together with the scaler it was fit on.
/// Never mutated after training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedModel {
    pub commodity: String,
    pub model_id: Uuid,
    pub algorithm: ModelKind,
    pub regressor: Regressor,
    pub scaler: StandardScaler,
    pub test_r2: f64,
    pub candidate_scores: Vec<CandidateScore>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub split_mode: SplitMode,
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
}

impl TrainedModel {
    /// Predicts from an unscaled feature vector.
    pub fn predict_raw(&self, features: &[f64]) -> Result<f64> {
        let scaled = self.scaler.transform(features)?;
        self.regressor
            .predict_one(scaled)
            .map_err(|e| ForecastError::training(&self.commodity, e))
    }

    pub fn report(&self) -> TrainingReport {
        TrainingReport {
            commodity: self.commodity.clone(),
            model_id: self.model_id,
            algorithm: self.algorithm,
            test_r2: self.test_r2,
            candidate_scores: self.candidate_scores.clone(),
            train_rows: self.train_rows,
            test_rows: self.test_rows,
            split_mode: self.split_mode,
        }
    }
}

/// Summary of a successful training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub commodity: String,
    pub model_id: Uuid,
    pub algorithm: ModelKind,
    pub test_r2: f64,
    pub candidate_scores: Vec<CandidateScore>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub split_mode: SplitMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainOutcome {
    Trained(TrainingReport),
    /// Too little history; the commodity has no published model afterwards.
    Skipped {
        commodity: String,
        rows: usize,
        required: usize,
    },
}

impl TrainOutcome {
    pub fn is_trained(&self) -> bool {
        matches!(self, TrainOutcome::Trained(_))
    }

    pub fn report(&self) -> Option<&TrainingReport> {
        match self {
            TrainOutcome::Trained(report) => Some(report),
            TrainOutcome::Skipped { .. } => None,
        }
    }
}

/// Row indices of the train and test partitions.
fn split_indices(n: usize, config: &TrainingConfig) -> (Vec<usize>, Vec<usize>) {
    let n_test = ((n as f64 * config.test_fraction).round() as usize).clamp(1, n.saturating_sub(1));
    let n_train = n - n_test;

    let mut indices: Vec<usize> = (0..n).collect();
    if config.split_mode == SplitMode::LegacyRandom {
        let mut rng = StdRng::seed_from_u64(config.split_seed);
        indices.shuffle(&mut rng);
    }
    let test = indices.split_off(n_train);
    (indices, test)
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>> {
    DenseMatrix::from_2d_vec(&rows.to_vec())
        .map_err(|e| ForecastError::invalid(format!("Matrix creation failed: {}", e)))
}

/// Fits a model for one series. `ForecastService` trains through this seam.
pub trait SeriesTrainer: Send + Sync {
    fn train(&self, series: &PriceSeries) -> Result<TrainedModel>;
}

pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains and selects a model for the series.
    ///
    /// Fails with `InsufficientHistory` below `min_training_rows` valid rows,
    /// and with `Training` when every candidate fails.
    pub fn train(&self, series: &PriceSeries) -> Result<TrainedModel> {
        let commodity = series.commodity();
        let table = build_training_table(series);
        let required = self.config.min_training_rows.max(2);
        if table.len() < required {
            return Err(ForecastError::InsufficientHistory {
                commodity: commodity.to_string(),
                rows: table.len(),
                required,
            });
        }
        self.fit_table(commodity, &table)
    }

    fn fit_table(&self, commodity: &str, table: &TrainingTable) -> Result<TrainedModel> {
        let matrix = table.feature_matrix();
        let (train_idx, test_idx) = split_indices(table.len(), &self.config);

        let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| matrix[i].clone()).collect();
        let train_y: Vec<f64> = train_idx.iter().map(|&i| table.targets[i]).collect();
        let test_x: Vec<Vec<f64>> = test_idx.iter().map(|&i| matrix[i].clone()).collect();
        let test_y: Vec<f64> = test_idx.iter().map(|&i| table.targets[i]).collect();

        let scaler = StandardScaler::fit(&train_x)?;
        let x_train = to_matrix(&scaler.transform_rows(&train_x)?)?;
        let x_test = to_matrix(&scaler.transform_rows(&test_x)?)?;

        debug!(
            "Training {}: {} train rows, {} test rows ({} split)",
            commodity,
            train_y.len(),
            test_y.len(),
            self.config.split_mode
        );

        let mut scores = Vec::with_capacity(EVALUATION_ORDER.len());
        let mut best: Option<(Regressor, f64)> = None;

        for kind in EVALUATION_ORDER {
            let evaluated = Regressor::fit(kind, &x_train, &train_y, &self.config).and_then(|m| {
                let predicted = m.predict(&x_test)?;
                match RegressionMetrics::evaluate(&predicted, &test_y) {
                    Some(metrics) if metrics.r2.is_finite() => Ok((m, metrics)),
                    _ => Err("non-finite test score".to_string()),
                }
            });

            match evaluated {
                Ok((model, metrics)) => {
                    debug!(
                        "{} {}: R²={:.4} RMSE={:.4} MAE={:.4}",
                        commodity, kind, metrics.r2, metrics.rmse, metrics.mae
                    );
                    scores.push(CandidateScore {
                        algorithm: kind,
                        metrics: Some(metrics),
                        error: None,
                    });
                    // Strictly greater: ties keep the earlier candidate.
                    if best.as_ref().is_none_or(|(_, r2)| metrics.r2 > *r2) {
                        best = Some((model, metrics.r2));
                    }
                }
                Err(e) => {
                    warn!("{} candidate {} failed: {}", commodity, kind, e);
                    scores.push(CandidateScore {
                        algorithm: kind,
                        metrics: None,
                        error: Some(e),
                    });
                }
            }
        }

        let (regressor, test_r2) =
            best.ok_or_else(|| ForecastError::training(commodity, "every candidate model failed"))?;

        let model = TrainedModel {
            commodity: commodity.to_string(),
            model_id: Uuid::new_v4(),
            algorithm: regressor.kind(),
            regressor,
            scaler,
            test_r2,
            candidate_scores: scores,
            train_rows: train_y.len(),
            test_rows: test_y.len(),
            split_mode: self.config.split_mode,
            feature_names: feature_names(),
            trained_at: Utc::now(),
        };

        info!(
            "Trained {} model for {}: R²={:.4} ({} train / {} test rows)",
            model.algorithm, commodity, model.test_r2, model.train_rows, model.test_rows
        );
        Ok(model)
    }
}

impl SeriesTrainer for ModelTrainer {
    fn train(&self, series: &PriceSeries) -> Result<TrainedModel> {
        ModelTrainer::train(self, series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::price_series::PricePoint;
    use chrono::{Duration, NaiveDate};

    fn seasonal_series(commodity: &str, days: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let points = (0..days)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as f64 / 365.0;
                let price = 30.0 * (1.0 + 0.1 * angle.sin()) + (i % 5) as f64 * 0.1;
                PricePoint::new(commodity, start + Duration::days(i as i64), price)
            })
            .collect();
        PriceSeries::from_points(commodity, points).unwrap()
    }

    #[test]
    fn test_chronological_split_keeps_order() {
        let (train, test) = split_indices(10, &TrainingConfig::default());
        assert_eq!(train, (0..8).collect::<Vec<_>>());
        assert_eq!(test, vec![8, 9]);
    }

    #[test]
    fn test_legacy_random_split_is_seeded() {
        let config = TrainingConfig {
            split_mode: SplitMode::LegacyRandom,
            ..Default::default()
        };
        let a = split_indices(50, &config);
        let b = split_indices(50, &config);
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 40);
        assert_eq!(a.1.len(), 10);
        assert_ne!(a.0, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_insufficient_history() {
        let trainer = ModelTrainer::new(TrainingConfig::lightweight());
        let err = trainer.train(&seasonal_series("Saffron", 40)).unwrap_err();
        match err {
            ForecastError::InsufficientHistory { rows, required, .. } => {
                assert_eq!(rows, 10);
                assert_eq!(required, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_selected_model_has_max_r2() {
        let trainer = ModelTrainer::new(TrainingConfig::lightweight());
        let model = trainer.train(&seasonal_series("Rice", 300)).unwrap();

        assert_eq!(model.candidate_scores.len(), 3);
        let best = model
            .candidate_scores
            .iter()
            .filter_map(CandidateScore::r2)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(model.test_r2, best);

        // The winner is the first candidate reaching the best score.
        let first_best = model
            .candidate_scores
            .iter()
            .find(|s| s.r2() == Some(best))
            .unwrap();
        assert_eq!(model.algorithm, first_best.algorithm);

        assert_eq!(model.train_rows + model.test_rows, 270);
        assert_eq!(model.feature_names, feature_names());
    }

    #[test]
    fn test_predict_raw_is_finite() {
        let trainer = ModelTrainer::new(TrainingConfig::lightweight());
        let series = seasonal_series("Rice", 200);
        let model = trainer.train(&series).unwrap();

        let table = build_training_table(&series);
        let row = table.rows.last().unwrap().to_vector();
        let p = model.predict_raw(&row).unwrap();
        assert!(p.is_finite());
        assert!(p > 20.0 && p < 40.0);
    }
}
