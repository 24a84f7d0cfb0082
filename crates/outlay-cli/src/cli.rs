//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Outlay - Track expenses, predict categories, stay inside budgets
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Expense categorization and budget alerts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, env = "OUTLAY_DB", default_value = "outlay.db", global = true)]
    pub db: PathBuf,

    /// Trained category model bundle
    #[arg(long, env = "OUTLAY_MODEL", default_value = "outlay-model.json", global = true)]
    pub model: PathBuf,

    /// Engine config file (defaults to ~/.local/share/outlay/config.toml, then built-in)
    #[arg(long, env = "OUTLAY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Train the category model and write the bundle
    Train {
        /// CSV corpus with description,category columns (built-in corpus if omitted)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Smoothing override
        #[arg(long)]
        alpha: Option<f64>,

        /// Holdout share override (0 disables evaluation)
        #[arg(long)]
        test_fraction: Option<f64>,
    },

    /// Show metadata of the trained model bundle
    ModelInfo,

    /// Predict the category of a description
    Predict {
        /// Expense description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record an expense
    Add {
        /// Expense description
        description: String,

        /// Amount spent
        amount: f64,

        /// Category (predicted from the description if omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List or delete expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage monthly budgets
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Spend summary for a period
    Summary {
        #[command(flatten)]
        period: PeriodArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Budget alerts for a period
    Alerts {
        #[command(flatten)]
        period: PeriodArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,

        /// Train on the built-in corpus first if the model bundle is missing
        #[arg(long)]
        train_if_missing: bool,
    },
}

/// Reporting period selection
#[derive(clap::Args, Debug, Clone)]
pub struct PeriodArgs {
    /// Period: this-month, last-month, this-year, last-30-days, all
    #[arg(long, default_value = "this-month")]
    pub period: String,

    /// Custom start date (YYYY-MM-DD), requires --to
    #[arg(long)]
    pub from: Option<String>,

    /// Custom end date (YYYY-MM-DD, inclusive), requires --from
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List recent expenses
    List {
        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Delete an expense by ID
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show every budget with its current status
    List {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Set a category's monthly limit
    Set {
        /// Category (Food, Transport, Shopping, Bills, Entertainment, Other)
        category: String,

        /// Monthly limit
        limit: f64,
    },

    /// Remove a category's budget
    Remove {
        /// Category
        category: String,
    },
}
