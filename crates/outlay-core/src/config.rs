//! Engine configuration
//!
//! Policy values (alert thresholds, minimum description length, training
//! smoothing) are read from TOML with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/outlay/config.toml)
//! 2. Embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/outlay.toml");

/// Spend-to-limit ratios at which a budgeted category changes tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub warning_ratio: f64,
    pub danger_ratio: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning_ratio: 0.8,
            danger_ratio: 1.0,
        }
    }
}

impl AlertThresholds {
    pub fn new(warning_ratio: f64, danger_ratio: f64) -> Result<Self> {
        let thresholds = Self {
            warning_ratio,
            danger_ratio,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        let ok = self.warning_ratio.is_finite()
            && self.danger_ratio.is_finite()
            && self.warning_ratio > 0.0
            && self.warning_ratio <= self.danger_ratio;
        if !ok {
            return Err(Error::Configuration(format!(
                "Alert thresholds must satisfy 0 < warning_ratio <= danger_ratio (got {} / {})",
                self.warning_ratio, self.danger_ratio
            )));
        }
        Ok(())
    }
}

/// Offline training parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    /// Additive smoothing for feature likelihoods
    pub alpha: f64,
    /// Share of each category held out for evaluation
    pub test_fraction: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            test_fraction: 0.15,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub alerts: AlertThresholds,
    /// Minimum trimmed description length the prediction service will classify
    pub min_description_chars: usize,
    pub training: TrainingOptions,
    pub currency_symbol: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alerts: AlertThresholds::default(),
            min_description_chars: 3,
            training: TrainingOptions::default(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration (explicit path, then data dir override, then embedded)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Configuration(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "Loading engine config");
                read_config(path)?
            }
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => {
                    debug!(path = %default_path.display(), "Loading engine config override");
                    read_config(&default_path)?
                }
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("outlay").join("config.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Configuration(format!("Failed to read config: {}", e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    alerts: Option<RawAlerts>,
    prediction: Option<RawPrediction>,
    training: Option<RawTraining>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawAlerts {
    warning_ratio: Option<f64>,
    danger_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    min_description_chars: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawTraining {
    alpha: Option<f64>,
    test_fraction: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Configuration(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(alerts) = raw.alerts {
        if let Some(warning) = alerts.warning_ratio {
            config.alerts.warning_ratio = warning;
        }
        if let Some(danger) = alerts.danger_ratio {
            config.alerts.danger_ratio = danger;
        }
    }

    if let Some(min_chars) = raw.prediction.and_then(|p| p.min_description_chars) {
        config.min_description_chars = min_chars;
    }

    if let Some(training) = raw.training {
        if let Some(alpha) = training.alpha {
            config.training.alpha = alpha;
        }
        if let Some(fraction) = training.test_fraction {
            config.training.test_fraction = fraction;
        }
    }

    if let Some(symbol) = raw.display.and_then(|d| d.currency_symbol) {
        config.currency_symbol = symbol;
    }

    config.alerts.validate()?;
    if !(config.training.alpha > 0.0) {
        return Err(Error::Configuration(format!(
            "training.alpha must be positive (got {})",
            config.training.alpha
        )));
    }
    if !(0.0..1.0).contains(&config.training.test_fraction) {
        return Err(Error::Configuration(format!(
            "training.test_fraction must be in [0, 1) (got {})",
            config.training.test_fraction
        )));
    }

    Ok(config)
}
