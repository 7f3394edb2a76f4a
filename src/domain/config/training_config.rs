//! Training Configuration Domain Value Object
//!
//! Hyper-parameters for candidate models and the train/test split, with
//! validation of the invariants the trainer relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TrainingConfigError {
    #[error("Invalid fraction: {field} = {value}. Must be strictly between 0.0 and 1.0")]
    InvalidFraction { field: String, value: f64 },

    #[error("Invalid count: {field} = {value}. Must be positive")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid min samples split: {field} = {value}. Must be at least 2")]
    InvalidMinSamplesSplit { field: String, value: usize },

    #[error("Invalid learning rate: {0}. Must be in (0.0, 1.0]")]
    InvalidLearningRate(f64),

    #[error("Unknown split mode: {0}. Must be 'chronological' or 'legacy_random'")]
    UnknownSplitMode(String),
}

/// How the feature table is partitioned into train and test rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitMode {
    /// Earliest rows train, latest rows test.
    #[default]
    Chronological,
    /// Seeded shuffle before splitting. Leaks future prices into training;
    /// kept only for compatibility with models trained that way.
    LegacyRandom,
}

impl FromStr for SplitMode {
    type Err = TrainingConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chronological" | "time" => Ok(SplitMode::Chronological),
            "legacy_random" | "random" => Ok(SplitMode::LegacyRandom),
            other => Err(TrainingConfigError::UnknownSplitMode(other.to_string())),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMode::Chronological => write!(f, "chronological"),
            SplitMode::LegacyRandom => write!(f, "legacy_random"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Minimum valid feature rows; fewer means the commodity is skipped.
    pub min_training_rows: usize,
    pub split_mode: SplitMode,
    /// Share of rows held out for scoring (e.g., 0.2 = 20%)
    pub test_fraction: f64,
    /// Shuffle seed for `SplitMode::LegacyRandom`
    pub split_seed: u64,

    // Random forest
    pub rf_trees: usize,
    pub rf_max_depth: u16,
    pub rf_min_samples_split: usize,
    pub rf_seed: u64,

    // Gradient boosting
    pub gb_rounds: usize,
    pub gb_learning_rate: f64,
    pub gb_max_depth: u16,
    pub gb_min_samples_split: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            min_training_rows: 100,
            split_mode: SplitMode::Chronological,
            test_fraction: 0.2,
            split_seed: 42,
            rf_trees: 100,
            rf_max_depth: 12,
            rf_min_samples_split: 2,
            rf_seed: 42,
            gb_rounds: 100,
            gb_learning_rate: 0.1,
            gb_max_depth: 3,
            gb_min_samples_split: 2,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), TrainingConfigError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(TrainingConfigError::InvalidFraction {
                field: "test_fraction".to_string(),
                value: self.test_fraction,
            });
        }

        for (field, value) in [
            ("min_training_rows", self.min_training_rows),
            ("rf_trees", self.rf_trees),
            ("rf_max_depth", self.rf_max_depth as usize),
            ("gb_rounds", self.gb_rounds),
            ("gb_max_depth", self.gb_max_depth as usize),
        ] {
            if value == 0 {
                return Err(TrainingConfigError::InvalidCount {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("rf_min_samples_split", self.rf_min_samples_split),
            ("gb_min_samples_split", self.gb_min_samples_split),
        ] {
            if value < 2 {
                return Err(TrainingConfigError::InvalidMinSamplesSplit {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if !(self.gb_learning_rate > 0.0 && self.gb_learning_rate <= 1.0) {
            return Err(TrainingConfigError::InvalidLearningRate(
                self.gb_learning_rate,
            ));
        }

        Ok(())
    }

    /// Smaller ensembles for fast test runs.
    pub fn lightweight() -> Self {
        Self {
            rf_trees: 20,
            rf_max_depth: 8,
            gb_rounds: 40,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(TrainingConfig::lightweight().validate().is_ok());
    }

    #[test]
    fn test_invalid_fraction() {
        let config = TrainingConfig {
            test_fraction: 1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            TrainingConfigError::InvalidFraction {
                field: "test_fraction".to_string(),
                value: 1.0,
            }
        );
    }

    #[test]
    fn test_zero_trees_rejected() {
        let config = TrainingConfig {
            rf_trees: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrainingConfigError::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_min_samples_split_below_two_rejected() {
        for value in [0, 1] {
            let config = TrainingConfig {
                rf_min_samples_split: value,
                ..Default::default()
            };
            assert_eq!(
                config.validate().unwrap_err(),
                TrainingConfigError::InvalidMinSamplesSplit {
                    field: "rf_min_samples_split".to_string(),
                    value,
                }
            );
        }

        let config = TrainingConfig {
            gb_min_samples_split: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrainingConfigError::InvalidMinSamplesSplit { .. })
        ));
    }

    #[test]
    fn test_split_mode_parsing() {
        assert_eq!(
            SplitMode::from_str("chronological").unwrap(),
            SplitMode::Chronological
        );
        assert_eq!(
            SplitMode::from_str("LEGACY_RANDOM").unwrap(),
            SplitMode::LegacyRandom
        );
        assert!(SplitMode::from_str("kfold").is_err());
        assert_eq!(SplitMode::LegacyRandom.to_string(), "legacy_random");
    }
}
