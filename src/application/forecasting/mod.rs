pub mod factors;
pub mod forecaster;
pub mod insights;
pub mod predictor;
pub mod recommendation;

pub use factors::FactorAnalyzer;
pub use forecaster::{CancellationFlag, ForecastIter};
pub use predictor::PredictionEngine;
