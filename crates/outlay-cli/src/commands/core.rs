//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Engine configuration (thresholds, input policy)
//! - `load_predictor` - Load the model bundle into a prediction service
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use outlay_core::{Database, EngineConfig, ModelBundle, PredictionService};

/// Open the database, creating it and its tables if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Load engine configuration (explicit file, data-dir override, or built-in defaults)
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    EngineConfig::load(path).context("Failed to load engine config")
}

/// Load the trained bundle; a missing or inconsistent bundle is fatal
pub fn load_predictor(model_path: &Path, config: &EngineConfig) -> Result<PredictionService> {
    let bundle = ModelBundle::load(model_path).with_context(|| {
        format!(
            "No usable category model at {} (run `outlay train` first)",
            model_path.display()
        )
    })?;
    Ok(PredictionService::new(bundle, config.min_description_chars))
}

pub fn cmd_init(db_path: &Path, model_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    println!("   Expenses recorded: {}", db.count_expenses()?);

    if model_path.exists() {
        println!("   🧠 Model bundle: {}", model_path.display());
    } else {
        println!("   ⚠️  No model bundle at {}", model_path.display());
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Train the category model: outlay train");
    println!("  2. Set a budget: outlay budget set Food 5000");
    println!("  3. Record expenses: outlay add \"Uber to airport\" 450");

    Ok(())
}
