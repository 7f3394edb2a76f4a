pub mod insights;
pub mod prediction;

pub use insights::MarketInsights;
pub use prediction::{PredictionFactors, PricePrediction};
