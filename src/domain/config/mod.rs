//! Configuration domain module
//!
//! Validated value objects for training and forecasting. Parsing from the
//! environment lives in `crate::config`.

pub mod forecast_config;
pub mod training_config;

pub use forecast_config::{ForecastConfig, ForecastMode, RecommendationThresholds};
pub use training_config::{SplitMode, TrainingConfig, TrainingConfigError};
