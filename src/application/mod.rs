// Multi-day forecasting, factors and market insights
pub mod forecasting;

// Feature pipeline, candidate models, training and the model registry
pub mod ml;

// Composition root
pub mod service;

pub use service::ForecastService;
