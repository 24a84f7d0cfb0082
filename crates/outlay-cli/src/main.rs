//! Outlay CLI - Expense categorization and budget alerts
//!
//! Usage:
//!   outlay init                          Initialize database
//!   outlay train                         Train the category model
//!   outlay add "Uber to airport" 450     Record an expense (category predicted)
//!   outlay alerts                        Show budget alerts for this month
//!   outlay serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, &cli.model),
        Commands::Train {
            corpus,
            alpha,
            test_fraction,
        } => {
            let mut options = config.training;
            if let Some(alpha) = alpha {
                options.alpha = alpha;
            }
            if let Some(fraction) = test_fraction {
                options.test_fraction = fraction;
            }
            commands::cmd_train(&cli.model, corpus.as_deref(), &options)
        }
        Commands::ModelInfo => commands::cmd_model_info(&cli.model),
        Commands::Predict { description, json } => {
            let predictor = commands::load_predictor(&cli.model, &config)?;
            commands::cmd_predict(&predictor, &description.join(" "), json)
        }
        Commands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let db = commands::open_db(&cli.db)?;
            // The model is only needed when the category has to be predicted
            let blank = category.as_deref().map_or(true, |c| c.trim().is_empty());
            let predictor = if blank {
                Some(commands::load_predictor(&cli.model, &config)?)
            } else {
                None
            };
            commands::cmd_add(
                &db,
                predictor.as_ref(),
                &description,
                amount,
                category.as_deref(),
                date.as_deref(),
            )
            .map(|_| ())
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_expenses_list(&db, 20),
                Some(ExpensesAction::List { limit }) => commands::cmd_expenses_list(&db, limit),
                Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(&db, id),
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db)?;
            let evaluator = outlay_core::BudgetAlertEvaluator::from_config(&config);
            match action {
                None => {
                    let period = commands::resolve_period("this-month", None, None)?;
                    commands::cmd_budget_list(&db, &evaluator, &period)
                }
                Some(BudgetAction::List { period }) => {
                    let period = commands::resolve_period(
                        &period.period,
                        period.from.as_deref(),
                        period.to.as_deref(),
                    )?;
                    commands::cmd_budget_list(&db, &evaluator, &period)
                }
                Some(BudgetAction::Set { category, limit }) => {
                    commands::cmd_budget_set(&db, &evaluator, &category, limit)
                }
                Some(BudgetAction::Remove { category }) => {
                    commands::cmd_budget_remove(&db, &category)
                }
            }
        }
        Commands::Summary { period, json } => {
            let db = commands::open_db(&cli.db)?;
            let evaluator = outlay_core::BudgetAlertEvaluator::from_config(&config);
            let period =
                commands::resolve_period(&period.period, period.from.as_deref(), period.to.as_deref())?;
            commands::cmd_summary(&db, &evaluator, &period, json)
        }
        Commands::Alerts { period, json } => {
            let db = commands::open_db(&cli.db)?;
            let evaluator = outlay_core::BudgetAlertEvaluator::from_config(&config);
            let period =
                commands::resolve_period(&period.period, period.from.as_deref(), period.to.as_deref())?;
            commands::cmd_alerts(&db, &evaluator, &period, json)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
            train_if_missing,
        } => {
            commands::cmd_serve(
                &cli.db,
                &cli.model,
                config,
                &host,
                port,
                static_dir.as_deref(),
                allowed_origins,
                train_if_missing,
            )
            .await
        }
    }
}
