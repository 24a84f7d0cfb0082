//! Prediction service
//!
//! Wraps the feature extractor and classifier behind input validation. The
//! service is immutable once built and safe to share across request handlers.

use tracing::debug;

use crate::classifier::CategoryClassifier;
use crate::error::{Error, Result};
use crate::features::FeatureExtractor;
use crate::model::{ModelBundle, ModelInfo};
use crate::models::{Category, Prediction};

#[derive(Debug, Clone, Default)]
pub struct PredictionService {
    extractor: FeatureExtractor,
    classifier: CategoryClassifier,
    min_description_chars: usize,
    info: Option<ModelInfo>,
}

impl PredictionService {
    pub fn new(bundle: ModelBundle, min_description_chars: usize) -> Self {
        let (extractor, classifier, info) = bundle.into_components();
        Self {
            extractor,
            classifier,
            min_description_chars,
            info: Some(info),
        }
    }

    /// A service with no model; every prediction fails with a configuration error
    pub fn unloaded(min_description_chars: usize) -> Self {
        Self {
            min_description_chars,
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.info.is_some()
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.info.as_ref()
    }

    pub fn min_description_chars(&self) -> usize {
        self.min_description_chars
    }

    /// Classify a description
    ///
    /// Fails with `InsufficientInput` when the trimmed description is shorter
    /// than the configured minimum, and with `Configuration` when no model is
    /// loaded.
    pub fn predict(&self, description: &str) -> Result<Prediction> {
        let trimmed = description.trim();
        let actual = trimmed.chars().count();
        if actual < self.min_description_chars {
            return Err(Error::InsufficientInput {
                min_chars: self.min_description_chars,
                actual,
            });
        }

        if !self.is_ready() {
            return Err(Error::Configuration(
                "No category model is loaded".to_string(),
            ));
        }

        let features = self.extractor.extract(trimmed)?;
        let distribution = self.classifier.classify(&features)?;
        let (category, top_confidence) = distribution.top();

        debug!(
            category = %category,
            confidence = top_confidence,
            known_terms = features.known_terms(),
            "Predicted category"
        );

        Ok(Prediction {
            category,
            confidence: distribution.to_map(),
            top_confidence,
            known_terms: features.known_terms(),
        })
    }

    /// Predict, substituting `fallback` only when the description is too short
    pub fn predict_or_default(&self, description: &str, fallback: Category) -> Result<Category> {
        match self.predict(description) {
            Ok(prediction) => Ok(prediction.category),
            Err(Error::InsufficientInput { .. }) => Ok(fallback),
            Err(e) => Err(e),
        }
    }
}
