pub mod candidates;
pub mod feature_pipeline;
pub mod gradient_boosting;
pub mod registry;
pub mod trainer;

pub use candidates::{ModelKind, Regressor};
pub use registry::ModelRegistry;
pub use trainer::{ModelTrainer, SeriesTrainer, TrainOutcome, TrainedModel, TrainingReport};
