//! Error types for Outlay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Model, vocabulary, or config file missing or inconsistent. Fatal for prediction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Description too short to classify meaningfully
    #[error("Insufficient input: description must be at least {min_chars} characters (got {actual})")]
    InsufficientInput { min_chars: usize, actual: usize },

    /// Rejected at the boundary (bad amount, limit, category, period)
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
