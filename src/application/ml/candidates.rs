use super::gradient_boosting::{GradientBoostedTrees, GradientBoostingParameters};
use crate::domain::config::TrainingConfig;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use std::fmt;

/// Candidate algorithms, in the fixed order they are evaluated.
/// On equal R² the earlier one wins, so this order is part of the contract.
pub const EVALUATION_ORDER: [ModelKind; 3] = [
    ModelKind::RandomForest,
    ModelKind::GradientBoosting,
    ModelKind::LinearRegression,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    RandomForest,
    GradientBoosting,
    LinearRegression,
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::GradientBoosting => "gradient_boosting",
            ModelKind::LinearRegression => "linear_regression",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fitted regression model of any candidate kind.
#[derive(Debug, Serialize, Deserialize)]
pub enum Regressor {
    RandomForest(RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    GradientBoosting(GradientBoostedTrees),
    LinearRegression(LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>),
}

impl Regressor {
    /// Fits `kind` on already-scaled rows.
    pub fn fit(
        kind: ModelKind,
        x: &DenseMatrix<f64>,
        y: &Vec<f64>,
        config: &TrainingConfig,
    ) -> Result<Self, String> {
        match kind {
            ModelKind::RandomForest => {
                let params = RandomForestRegressorParameters::default()
                    .with_n_trees(config.rf_trees)
                    .with_max_depth(config.rf_max_depth)
                    .with_min_samples_split(config.rf_min_samples_split)
                    .with_seed(config.rf_seed);
                RandomForestRegressor::fit(x, y, params)
                    .map(Regressor::RandomForest)
                    .map_err(|e| format!("Random forest training error: {}", e))
            }
            ModelKind::GradientBoosting => {
                let params = GradientBoostingParameters {
                    n_rounds: config.gb_rounds,
                    learning_rate: config.gb_learning_rate,
                    max_depth: config.gb_max_depth,
                    min_samples_split: config.gb_min_samples_split,
                };
                GradientBoostedTrees::fit(x, y, params)
                    .map(Regressor::GradientBoosting)
                    .map_err(|e| format!("Gradient boosting training error: {}", e))
            }
            ModelKind::LinearRegression => {
                let params = LinearRegressionParameters::default()
                    .with_solver(LinearRegressionSolverName::SVD);
                LinearRegression::fit(x, y, params)
                    .map(Regressor::LinearRegression)
                    .map_err(|e| format!("Linear regression training error: {}", e))
            }
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Regressor::RandomForest(_) => ModelKind::RandomForest,
            Regressor::GradientBoosting(_) => ModelKind::GradientBoosting,
            Regressor::LinearRegression(_) => ModelKind::LinearRegression,
        }
    }

    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, String> {
        let result = match self {
            Regressor::RandomForest(m) => m.predict(x),
            Regressor::GradientBoosting(m) => m.predict(x),
            Regressor::LinearRegression(m) => m.predict(x),
        };
        result.map_err(|e| format!("Predict error: {}", e))
    }

    /// Predicts a single already-scaled row.
    pub fn predict_one(&self, row: Vec<f64>) -> Result<f64, String> {
        let matrix = DenseMatrix::from_2d_vec(&vec![row])
            .map_err(|e| format!("Matrix creation failed: {}", e))?;
        self.predict(&matrix)?
            .first()
            .copied()
            .ok_or_else(|| "No prediction returned".to_string())
    }
}
