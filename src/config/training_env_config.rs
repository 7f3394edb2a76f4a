//! Training configuration parsing from environment variables.
//!
//! Covers the train/test split and candidate model hyper-parameters.

use super::{Lookup, parse_or};
use crate::domain::config::{SplitMode, TrainingConfig};
use anyhow::{Context, Result};

pub fn training_from_lookup(lookup: Lookup<'_>) -> Result<TrainingConfig> {
    let d = TrainingConfig::default();

    let split_mode = match lookup("TRAIN_SPLIT_MODE") {
        Some(raw) => raw
            .parse::<SplitMode>()
            .context("Failed to parse TRAIN_SPLIT_MODE")?,
        None => d.split_mode,
    };

    let config = TrainingConfig {
        min_training_rows: parse_or(lookup, "MIN_TRAINING_ROWS", d.min_training_rows)?,
        split_mode,
        test_fraction: parse_or(lookup, "TEST_FRACTION", d.test_fraction)?,
        split_seed: parse_or(lookup, "SPLIT_SEED", d.split_seed)?,
        rf_trees: parse_or(lookup, "RF_TREES", d.rf_trees)?,
        rf_max_depth: parse_or(lookup, "RF_MAX_DEPTH", d.rf_max_depth)?,
        rf_min_samples_split: parse_or(lookup, "RF_MIN_SAMPLES_SPLIT", d.rf_min_samples_split)?,
        rf_seed: parse_or(lookup, "RF_SEED", d.rf_seed)?,
        gb_rounds: parse_or(lookup, "GB_ROUNDS", d.gb_rounds)?,
        gb_learning_rate: parse_or(lookup, "GB_LEARNING_RATE", d.gb_learning_rate)?,
        gb_max_depth: parse_or(lookup, "GB_MAX_DEPTH", d.gb_max_depth)?,
        gb_min_samples_split: parse_or(lookup, "GB_MIN_SAMPLES_SPLIT", d.gb_min_samples_split)?,
    };

    config
        .validate()
        .context("Invalid training configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = training_from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(config, TrainingConfig::default());
    }

    #[test]
    fn test_overrides() {
        let lookup = lookup_from(&[
            ("TRAIN_SPLIT_MODE", "legacy_random"),
            ("RF_TREES", "25"),
            ("GB_LEARNING_RATE", "0.05"),
            ("MIN_TRAINING_ROWS", "60"),
        ]);
        let config = training_from_lookup(&lookup).unwrap();
        assert_eq!(config.split_mode, SplitMode::LegacyRandom);
        assert_eq!(config.rf_trees, 25);
        assert_eq!(config.gb_learning_rate, 0.05);
        assert_eq!(config.min_training_rows, 60);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(training_from_lookup(&lookup_from(&[("RF_TREES", "many")])).is_err());
        assert!(training_from_lookup(&lookup_from(&[("TEST_FRACTION", "1.5")])).is_err());
        assert!(training_from_lookup(&lookup_from(&[("TRAIN_SPLIT_MODE", "kfold")])).is_err());

        let err = training_from_lookup(&lookup_from(&[("GB_MIN_SAMPLES_SPLIT", "1")])).unwrap_err();
        assert!(format!("{:#}", err).contains("gb_min_samples_split"));
    }
}
