pub mod feature_registry;
pub mod metrics;
pub mod scaler;

pub use feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureRow};
pub use metrics::RegressionMetrics;
pub use scaler::StandardScaler;
