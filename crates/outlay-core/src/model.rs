//! Versioned classifier bundle
//!
//! The vocabulary and classifier parameters are always shipped together in
//! one JSON document. A bundle whose format version or feature dimensions do
//! not line up is a configuration error, never a recoverable one.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::{CategoryClassifier, ClassifierParameters};
use crate::corpus::TrainingExample;
use crate::error::{Error, Result};
use crate::features::{FeatureExtractor, FeatureVector, Vocabulary};
use crate::models::Category;
use crate::training::EvaluationReport;

/// Current bundle format. Bump when the feature or parameter layout changes.
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// Trained vocabulary + classifier parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    /// Smoothing used at training time
    pub alpha: f64,
    /// Number of examples the parameters were fitted on
    pub training_examples: usize,
    vocabulary: Vocabulary,
    parameters: ClassifierParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationReport>,
}

/// Bundle metadata for status output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub vocabulary_size: usize,
    pub training_examples: usize,
    pub accuracy: Option<f64>,
}

impl ModelBundle {
    /// Fit a vocabulary and classifier on a labeled corpus
    pub fn fit(examples: &[TrainingExample], alpha: f64) -> Result<Self> {
        let descriptions: Vec<&str> = examples.iter().map(|e| e.description.as_str()).collect();
        let vocabulary = Vocabulary::fit(&descriptions)?;

        let extractor = FeatureExtractor::new(vocabulary);
        let vectors = descriptions
            .iter()
            .map(|d| extractor.extract(d))
            .collect::<Result<Vec<FeatureVector>>>()?;
        let labels: Vec<Category> = examples.iter().map(|e| e.category).collect();
        let parameters = ClassifierParameters::fit(&vectors, &labels, alpha)?;

        let vocabulary = extractor
            .vocabulary()
            .cloned()
            .ok_or_else(|| Error::Configuration("Vocabulary lost during training".to_string()))?;

        let bundle = Self {
            format_version: BUNDLE_FORMAT_VERSION,
            created_at: Utc::now(),
            alpha,
            training_examples: examples.len(),
            vocabulary,
            parameters,
            evaluation: None,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check format version and that the feature space matches the parameters
    pub fn validate(&self) -> Result<()> {
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(Error::Configuration(format!(
                "Unsupported model bundle version {} (expected {})",
                self.format_version, BUNDLE_FORMAT_VERSION
            )));
        }
        if self.vocabulary.len() != self.parameters.feature_count() {
            return Err(Error::Configuration(format!(
                "Model bundle mismatch: vocabulary has {} terms but classifier expects {}",
                self.vocabulary.len(),
                self.parameters.feature_count()
            )));
        }
        Ok(())
    }

    /// Parse and validate a bundle from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("Invalid model bundle: {}", e)))?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Load a bundle from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read model bundle {}: {}",
                path.display(),
                e
            ))
        })?;
        let bundle = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            vocabulary = bundle.vocabulary.len(),
            examples = bundle.training_examples,
            "Loaded model bundle"
        );
        Ok(bundle)
    }

    /// Write the bundle atomically (temp file in the same directory, then rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, self)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn parameters(&self) -> &ClassifierParameters {
        &self.parameters
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            format_version: self.format_version,
            created_at: self.created_at,
            vocabulary_size: self.vocabulary.len(),
            training_examples: self.training_examples,
            accuracy: self.evaluation.as_ref().and_then(|e| e.accuracy),
        }
    }

    /// Split into a ready extractor/classifier pair plus metadata
    pub fn into_components(self) -> (FeatureExtractor, CategoryClassifier, ModelInfo) {
        let info = self.info();
        (
            FeatureExtractor::new(self.vocabulary),
            CategoryClassifier::new(self.parameters),
            info,
        )
    }
}
