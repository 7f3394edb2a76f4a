// Validated configuration value objects
pub mod config;

// Domain-specific error types
pub mod errors;

// Prediction and insight types
pub mod forecast;

// Price observations and seasonal demand
pub mod market;

// Feature layout, scaling and scoring
pub mod ml;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;
