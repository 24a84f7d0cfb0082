//! Outlay Core Library
//!
//! Expense category inference and budget alerting:
//! - TF-IDF feature extraction and a naive Bayes category classifier
//! - Versioned model bundles with offline training and evaluation
//! - Prediction service with input validation
//! - Spend aggregation and budget alert evaluation
//! - SQLite ledger and budget storage
//! - Engine configuration (thresholds, minimum input length)

pub mod aggregate;
pub mod alerts;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod features;
pub mod model;
pub mod models;
pub mod prediction;
pub mod training;

pub use aggregate::aggregate;
pub use alerts::BudgetAlertEvaluator;
pub use classifier::{CategoryClassifier, CategoryDistribution, ClassifierParameters};
pub use config::{AlertThresholds, EngineConfig, TrainingOptions};
pub use corpus::{builtin_corpus, load_corpus_csv, TrainingExample};
pub use db::{Database, LedgerSnapshot};
pub use error::{Error, Result};
pub use features::{FeatureExtractor, FeatureVector, Vocabulary};
pub use model::{ModelBundle, ModelInfo, BUNDLE_FORMAT_VERSION};
pub use models::{
    Alert, Budget, BudgetMap, BudgetStatus, Category, CategorySpend, Expense, NewExpense, Period,
    Prediction, Severity, SpendSummary, Tier,
};
pub use prediction::PredictionService;
pub use training::{train_and_evaluate, EvaluationReport};
