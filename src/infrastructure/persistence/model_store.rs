//! Model artifact persistence.
//!
//! All trained models are written to a single versioned JSON document:
//!
//! ```json
//! { "format": "cropcast-models", "schema_version": 1,
//!   "feature_names": [...], "saved_at": "...", "models": { "Rice": {...} } }
//! ```
//!
//! Loading validates the whole document before returning anything, so a
//! caller can swap the result in atomically or keep what it has.

use crate::application::ml::trainer::TrainedModel;
use crate::domain::errors::{ForecastError, Result};
use crate::domain::ml::feature_registry::{FEATURE_COUNT, feature_names};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const ARTIFACT_FORMAT: &str = "cropcast-models";
/// Bump on any change to the feature list or the serialized model layout.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format: &'a str,
    schema_version: u32,
    feature_names: Vec<String>,
    saved_at: DateTime<Utc>,
    models: BTreeMap<&'a str, &'a TrainedModel>,
}

#[derive(Deserialize)]
struct ArtifactHeader {
    format: String,
    schema_version: u32,
}

#[derive(Deserialize)]
struct Artifact {
    feature_names: Vec<String>,
    saved_at: DateTime<Utc>,
    models: BTreeMap<String, TrainedModel>,
}

/// Reads and writes model artifacts at one path.
pub struct ModelStore {
    file_path: PathBuf,
}

impl ModelStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Writes every model; returns how many were saved.
    pub fn save(&self, models: &HashMap<String, Arc<TrainedModel>>) -> Result<usize> {
        let artifact = ArtifactRef {
            format: ARTIFACT_FORMAT,
            schema_version: SCHEMA_VERSION,
            feature_names: feature_names(),
            saved_at: Utc::now(),
            models: models
                .iter()
                .map(|(k, m)| (k.as_str(), m.as_ref()))
                .collect(),
        };
        let content = serde_json::to_string(&artifact)
            .map_err(|e| ForecastError::invalid(format!("Failed to serialize models: {}", e)))?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.file_path)?;

        info!("Saved {} models to {:?}", models.len(), self.file_path);
        Ok(models.len())
    }

    /// Reads and validates an artifact. Nothing is returned unless every
    /// model in it passes validation.
    pub fn load(&self) -> Result<HashMap<String, Arc<TrainedModel>>> {
        let bytes = fs::read(&self.file_path)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| ForecastError::corrupt(format!("artifact is not UTF-8 text: {}", e)))?;

        let header: ArtifactHeader = serde_json::from_str(&content)
            .map_err(|e| ForecastError::corrupt(format!("unreadable artifact header: {}", e)))?;
        if header.format != ARTIFACT_FORMAT {
            return Err(ForecastError::corrupt(format!(
                "unexpected format '{}'",
                header.format
            )));
        }
        if header.schema_version != SCHEMA_VERSION {
            return Err(ForecastError::corrupt(format!(
                "schema version {} does not match supported version {}",
                header.schema_version, SCHEMA_VERSION
            )));
        }

        let artifact: Artifact = serde_json::from_str(&content)
            .map_err(|e| ForecastError::corrupt(format!("unparsable artifact: {}", e)))?;
        let expected = feature_names();
        if artifact.feature_names != expected {
            return Err(ForecastError::corrupt(
                "artifact feature names differ from the current feature registry",
            ));
        }

        let mut models = HashMap::with_capacity(artifact.models.len());
        for (commodity, model) in artifact.models {
            validate_model(&commodity, &model, &expected)?;
            models.insert(commodity, Arc::new(model));
        }

        info!(
            "Loaded {} models from {:?} (saved {})",
            models.len(),
            self.file_path,
            artifact.saved_at
        );
        Ok(models)
    }
}

fn validate_model(commodity: &str, model: &TrainedModel, expected: &[String]) -> Result<()> {
    if model.commodity != commodity {
        return Err(ForecastError::corrupt(format!(
            "model stored under {} belongs to {}",
            commodity, model.commodity
        )));
    }
    if model.feature_names != expected {
        return Err(ForecastError::corrupt(format!(
            "{} model was trained on a different feature list",
            commodity
        )));
    }
    if model.scaler.dims() != FEATURE_COUNT || !model.scaler.is_consistent() {
        return Err(ForecastError::corrupt(format!(
            "{} scaler has {} usable dimensions, expected {}",
            commodity,
            model.scaler.dims(),
            FEATURE_COUNT
        )));
    }
    if model.regressor.kind() != model.algorithm {
        return Err(ForecastError::corrupt(format!(
            "{} model is labelled {} but holds a {} regressor",
            commodity,
            model.algorithm,
            model.regressor.kind()
        )));
    }
    Ok(())
}
