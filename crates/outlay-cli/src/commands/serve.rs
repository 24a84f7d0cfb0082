//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use outlay_core::corpus::builtin_corpus;
use outlay_core::training::train_and_evaluate;
use outlay_core::{EngineConfig, PredictionService};
use outlay_server::ServerConfig;
use tracing::warn;

use super::{load_predictor, open_db};

#[allow(clippy::too_many_arguments)]
pub async fn cmd_serve(
    db_path: &Path,
    model_path: &Path,
    config: EngineConfig,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
    train_if_missing: bool,
) -> Result<()> {
    println!("🚀 Starting Outlay web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    if train_if_missing && !model_path.exists() {
        println!("   🧠 No model at {}, training on built-in corpus", model_path.display());
        let bundle = train_and_evaluate(&builtin_corpus(), &config.training)
            .context("Failed to train model")?;
        bundle
            .save(model_path)
            .with_context(|| format!("Failed to write model to {}", model_path.display()))?;
    }

    let predictor = match load_predictor(model_path, &config) {
        Ok(service) => {
            println!("   Model: {}", model_path.display());
            service
        }
        Err(e) => {
            warn!(error = %e, "Serving without a category model");
            println!("   ⚠️  No model loaded, /api/predict will return 503");
            PredictionService::unloaded(config.min_description_chars)
        }
    };
    let predictor = Arc::new(predictor);
    println!(
        "   Alerts: warning at {:.0}%, danger at {:.0}%",
        config.alerts.warning_ratio * 100.0,
        config.alerts.danger_ratio * 100.0
    );

    let db = open_db(db_path)?;
    let static_dir_str = static_dir.and_then(|p| p.to_str());

    let server_config = ServerConfig {
        allowed_origins,
        engine: config,
    };

    outlay_server::serve(db, predictor, host, port, static_dir_str, server_config).await
}
