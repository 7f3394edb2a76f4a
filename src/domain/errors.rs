use thiserror::Error;

/// Errors raised by the forecasting engine.
///
/// Callers can tell "no data yet" apart from transient failures with
/// [`ForecastError::is_missing_data`] and [`ForecastError::is_transient`].
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Unknown commodity: {commodity}")]
    UnknownCommodity { commodity: String },

    #[error("Insufficient history for {commodity}: {rows} feature rows < {required} required")]
    InsufficientHistory {
        commodity: String,
        rows: usize,
        required: usize,
    },

    #[error("No trained model available for {commodity}")]
    ModelUnavailable { commodity: String },

    #[error("Corrupt model artifact: {reason}")]
    CorruptArtifact { reason: String },

    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("Training failed for {commodity}: {reason}")]
    Training { commodity: String, reason: String },

    #[error("Malformed feed data: {reason}")]
    Feed { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    pub fn unknown_commodity(commodity: &str) -> Self {
        Self::UnknownCommodity {
            commodity: commodity.to_string(),
        }
    }

    pub fn model_unavailable(commodity: &str) -> Self {
        Self::ModelUnavailable {
            commodity: commodity.to_string(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptArtifact {
            reason: reason.into(),
        }
    }

    pub fn training(commodity: &str, reason: impl std::fmt::Display) -> Self {
        Self::Training {
            commodity: commodity.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The commodity has no series or no model yet. Retrying without new data will not help.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommodity { .. }
                | Self::InsufficientHistory { .. }
                | Self::ModelUnavailable { .. }
        )
    }

    /// The failure may clear up on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Training { .. } | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_history_formatting() {
        let err = ForecastError::InsufficientHistory {
            commodity: "Saffron".to_string(),
            rows: 10,
            required: 100,
        };

        let msg = err.to_string();
        assert!(msg.contains("Saffron"));
        assert!(msg.contains("10"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_error_classes() {
        assert!(ForecastError::unknown_commodity("Rice").is_missing_data());
        assert!(ForecastError::model_unavailable("Rice").is_missing_data());
        assert!(!ForecastError::model_unavailable("Rice").is_transient());

        let io = ForecastError::from(std::io::Error::other("disk"));
        assert!(io.is_transient());
        assert!(!io.is_missing_data());

        assert!(ForecastError::training("Rice", "singular").is_transient());
        assert!(!ForecastError::invalid("days must be >= 1").is_transient());
        assert!(!ForecastError::corrupt("bad version").is_missing_data());
    }
}
