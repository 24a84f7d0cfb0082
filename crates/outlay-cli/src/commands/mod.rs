//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_config, load_predictor)
//! - `training` - Offline model training and bundle inspection
//! - `predict` - Category prediction
//! - `expenses` - Record, list and delete expenses
//! - `budgets` - Budget management and status
//! - `reports` - Spend summary and alerts
//! - `serve` - Web server command

pub mod budgets;
pub mod core;
pub mod expenses;
pub mod predict;
pub mod reports;
pub mod serve;
pub mod training;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use predict::*;
pub use reports::*;
pub use serve::*;
pub use training::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
