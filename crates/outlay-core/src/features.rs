//! TF-IDF feature extraction over unigrams and adjacent bigrams
//!
//! The vocabulary is learned once from the training corpus and never changes
//! afterwards. Terms are indexed in sorted order, so fitting the same corpus
//! twice produces identical vocabularies.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Runs of two or more word characters
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid regex"))
}

/// Lower-case and split a description into word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Unigrams followed by contiguous bigrams ("a b")
pub fn terms(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let bigrams: Vec<String> = tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();
    let mut all = tokens;
    all.extend(bigrams);
    all
}

/// Serialized form of a vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyData {
    terms: Vec<String>,
    idf: Vec<f64>,
}

/// Term → (index, idf) mapping learned from a corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VocabularyData", into = "VocabularyData")]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f64>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Learn terms and smoothed IDF weights from a set of documents
    ///
    /// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<String> = terms(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(Error::Configuration(
                "Training corpus produced an empty vocabulary".to_string(),
            ));
        }

        let n = documents.len() as f64;
        let (terms, idf): (Vec<String>, Vec<f64>) = doc_freq
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .unzip();

        Self::from_parts(terms, idf)
    }

    fn from_parts(terms: Vec<String>, idf: Vec<f64>) -> Result<Self> {
        if terms.len() != idf.len() {
            return Err(Error::Configuration(format!(
                "Vocabulary has {} terms but {} idf weights",
                terms.len(),
                idf.len()
            )));
        }
        if terms.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Configuration(
                "Vocabulary terms must be sorted and unique".to_string(),
            ));
        }
        if idf.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(Error::Configuration(
                "Vocabulary idf weights must be finite and positive".to_string(),
            ));
        }

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Ok(Self { terms, idf, index })
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }
}

impl TryFrom<VocabularyData> for Vocabulary {
    type Error = Error;

    fn try_from(data: VocabularyData) -> Result<Self> {
        Self::from_parts(data.terms, data.idf)
    }
}

impl From<Vocabulary> for VocabularyData {
    fn from(vocab: Vocabulary) -> Self {
        Self {
            terms: vocab.terms,
            idf: vocab.idf,
        }
    }
}

/// Dense feature vector with one slot per vocabulary term
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            values: vec![0.0; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Non-zero entries as (index, weight)
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(i, w)| (i, *w))
    }

    /// Number of in-vocabulary features present
    pub fn known_terms(&self) -> usize {
        self.nonzero().count()
    }
}

/// Converts descriptions into feature vectors
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    vocabulary: Option<Vocabulary>,
}

impl FeatureExtractor {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary: Some(vocabulary),
        }
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// Output dimensionality (0 when no vocabulary is loaded)
    pub fn dim(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, Vocabulary::len)
    }

    /// Weighted, L2-normalised term frequencies. Out-of-vocabulary terms are dropped.
    pub fn extract(&self, text: &str) -> Result<FeatureVector> {
        let vocab = self.vocabulary.as_ref().ok_or_else(|| {
            Error::Configuration("Feature extractor has no vocabulary loaded".to_string())
        })?;

        let mut values = vec![0.0; vocab.len()];
        for term in terms(text) {
            if let Some(i) = vocab.index_of(&term) {
                values[i] += 1.0;
            }
        }

        for (i, value) in values.iter_mut().enumerate() {
            if *value != 0.0 {
                *value *= vocab.idf[i];
            }
        }

        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in values.iter_mut() {
                *value /= norm;
            }
        }

        Ok(FeatureVector::new(values))
    }
}
