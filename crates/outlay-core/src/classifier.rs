//! Multinomial naive Bayes over TF-IDF features
//!
//! Scores are accumulated in log space and normalised with log-sum-exp, so
//! long descriptions never underflow. Inference is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::models::Category;

/// Serialized form of classifier parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParametersData {
    log_priors: Vec<f64>,
    feature_log_likelihoods: Vec<Vec<f64>>,
}

/// Per-category log priors and per-category/per-feature log likelihoods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParametersData", into = "ParametersData")]
pub struct ClassifierParameters {
    log_priors: [f64; Category::COUNT],
    /// Indexed `[category][feature]`
    feature_log_likelihoods: Vec<Vec<f64>>,
}

impl ClassifierParameters {
    /// Fit from labeled feature vectors
    ///
    /// `log P(c)   = ln((n_c + alpha) / (n + alpha * K))`
    /// `log P(f|c) = ln((w_cf + alpha) / (w_c + alpha * |V|))`
    /// where `w_cf` is the summed weight of feature `f` over examples of `c`.
    pub fn fit(vectors: &[FeatureVector], labels: &[Category], alpha: f64) -> Result<Self> {
        if vectors.len() != labels.len() {
            return Err(Error::Configuration(format!(
                "{} feature vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }
        if vectors.is_empty() {
            return Err(Error::Configuration(
                "Cannot train a classifier without examples".to_string(),
            ));
        }
        if !(alpha > 0.0) {
            return Err(Error::Configuration(format!(
                "Smoothing alpha must be positive (got {})",
                alpha
            )));
        }

        let dim = vectors[0].dim();
        let mut class_counts = [0usize; Category::COUNT];
        let mut feature_weights = vec![vec![0.0; dim]; Category::COUNT];

        for (vector, label) in vectors.iter().zip(labels) {
            if vector.dim() != dim {
                return Err(Error::Configuration(format!(
                    "Feature vector dimension {} differs from {}",
                    vector.dim(),
                    dim
                )));
            }
            let c = label.index();
            class_counts[c] += 1;
            for (f, weight) in vector.nonzero() {
                feature_weights[c][f] += weight;
            }
        }

        let n = vectors.len() as f64;
        let k = Category::COUNT as f64;
        let mut log_priors = [0.0; Category::COUNT];
        for (c, count) in class_counts.iter().enumerate() {
            log_priors[c] = ((*count as f64 + alpha) / (n + alpha * k)).ln();
        }

        let feature_log_likelihoods = feature_weights
            .into_iter()
            .map(|weights| {
                let total: f64 = weights.iter().sum();
                let denom = total + alpha * dim as f64;
                weights
                    .into_iter()
                    .map(|w| ((w + alpha) / denom).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            log_priors,
            feature_log_likelihoods,
        })
    }

    /// Number of input features expected
    pub fn feature_count(&self) -> usize {
        self.feature_log_likelihoods.first().map_or(0, Vec::len)
    }

    pub fn log_prior(&self, category: Category) -> f64 {
        self.log_priors[category.index()]
    }
}

impl TryFrom<ParametersData> for ClassifierParameters {
    type Error = Error;

    fn try_from(data: ParametersData) -> Result<Self> {
        let log_priors: [f64; Category::COUNT] =
            data.log_priors.as_slice().try_into().map_err(|_| {
                Error::Configuration(format!(
                    "Expected {} log priors, found {}",
                    Category::COUNT,
                    data.log_priors.len()
                ))
            })?;

        if data.feature_log_likelihoods.len() != Category::COUNT {
            return Err(Error::Configuration(format!(
                "Expected {} likelihood rows, found {}",
                Category::COUNT,
                data.feature_log_likelihoods.len()
            )));
        }
        let dim = data.feature_log_likelihoods[0].len();
        if data
            .feature_log_likelihoods
            .iter()
            .any(|row| row.len() != dim)
        {
            return Err(Error::Configuration(
                "Likelihood rows have inconsistent lengths".to_string(),
            ));
        }
        let all_finite = log_priors.iter().all(|v| v.is_finite())
            && data
                .feature_log_likelihoods
                .iter()
                .flatten()
                .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::Configuration(
                "Classifier parameters contain non-finite values".to_string(),
            ));
        }

        Ok(Self {
            log_priors,
            feature_log_likelihoods: data.feature_log_likelihoods,
        })
    }
}

impl From<ClassifierParameters> for ParametersData {
    fn from(params: ClassifierParameters) -> Self {
        Self {
            log_priors: params.log_priors.to_vec(),
            feature_log_likelihoods: params.feature_log_likelihoods,
        }
    }
}

/// Probability per category, summing to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryDistribution {
    probabilities: [f64; Category::COUNT],
}

impl CategoryDistribution {
    pub fn probability(&self, category: Category) -> f64 {
        self.probabilities[category.index()]
    }

    /// Most likely category; ties go to the earliest in `Category::ALL`
    pub fn top(&self) -> (Category, f64) {
        let mut best = 0;
        for i in 1..Category::COUNT {
            if self.probabilities[i] > self.probabilities[best] {
                best = i;
            }
        }
        (Category::ALL[best], self.probabilities[best])
    }

    pub fn to_map(&self) -> BTreeMap<Category, f64> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.probability(*c)))
            .collect()
    }
}

/// Normalise log scores into probabilities via log-sum-exp
fn log_softmax(log_values: &[f64; Category::COUNT]) -> [f64; Category::COUNT] {
    let max = log_values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = log_values.iter().map(|&lp| (lp - max).exp()).sum();
    let log_sum = max + sum.ln();

    let mut probs = [0.0; Category::COUNT];
    for (i, &lp) in log_values.iter().enumerate() {
        probs[i] = (lp - log_sum).exp();
    }
    probs
}

/// Category classifier; holds no parameters until a model is loaded
#[derive(Debug, Clone, Default)]
pub struct CategoryClassifier {
    parameters: Option<ClassifierParameters>,
}

impl CategoryClassifier {
    pub fn new(parameters: ClassifierParameters) -> Self {
        Self {
            parameters: Some(parameters),
        }
    }

    pub fn parameters(&self) -> Option<&ClassifierParameters> {
        self.parameters.as_ref()
    }

    pub fn classify(&self, features: &FeatureVector) -> Result<CategoryDistribution> {
        let params = self.parameters.as_ref().ok_or_else(|| {
            Error::Configuration("Classifier has no parameters loaded".to_string())
        })?;

        if features.dim() != params.feature_count() {
            return Err(Error::Configuration(format!(
                "Feature vector has {} dimensions but classifier expects {}",
                features.dim(),
                params.feature_count()
            )));
        }

        let mut scores = params.log_priors;
        for (c, score) in scores.iter_mut().enumerate() {
            let likelihoods = &params.feature_log_likelihoods[c];
            for (f, weight) in features.nonzero() {
                *score += weight * likelihoods[f];
            }
        }

        Ok(CategoryDistribution {
            probabilities: log_softmax(&scores),
        })
    }
}
