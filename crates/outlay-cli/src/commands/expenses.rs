//! Expense command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use outlay_core::models::{parse_date, Category, NewExpense};
use outlay_core::{Database, PredictionService};

use super::truncate;

/// Record an expense, predicting the category when none is given
///
/// Returns the new expense ID.
pub fn cmd_add(
    db: &Database,
    predictor: Option<&PredictionService>,
    description: &str,
    amount: f64,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<i64> {
    let date = match date {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    let mut expense = NewExpense {
        description: description.to_string(),
        amount,
        category: Category::Other,
        date,
    };
    expense.validate()?;

    let category = category.map(str::trim).filter(|s| !s.is_empty());

    let note = match (category, predictor) {
        (Some(name), _) => {
            expense.category = Category::parse(name)?;
            String::new()
        }
        (None, Some(predictor)) => match predictor.predict(description) {
            Ok(prediction) => {
                expense.category = prediction.category;
                format!(" (predicted, {:.0}%)", prediction.top_confidence * 100.0)
            }
            Err(outlay_core::Error::InsufficientInput { .. }) => {
                " (description too short to predict)".to_string()
            }
            Err(e) => return Err(e).context("Category prediction failed"),
        },
        (None, None) => anyhow::bail!("No category given and no model loaded"),
    };

    let id = db.insert_expense(&expense)?;
    println!(
        "✅ Recorded #{}: {} {:.2} → {}{}",
        id,
        truncate(expense.description.trim(), 40),
        expense.amount,
        expense.category,
        note
    );

    Ok(id)
}

pub fn cmd_expenses_list(db: &Database, limit: i64) -> Result<()> {
    let expenses = db.list_expenses(limit)?;

    if expenses.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }

    println!(
        "{:>5} │ {:10} │ {:40} │ {:13} │ {:>10}",
        "ID", "Date", "Description", "Category", "Amount"
    );
    println!("──────┼────────────┼──────────────────────────────────────────┼───────────────┼───────────");
    for e in &expenses {
        println!(
            "{:>5} │ {:10} │ {:40} │ {:13} │ {:>10.2}",
            e.id,
            e.date,
            truncate(&e.description, 40),
            e.category.as_str(),
            e.amount
        );
    }
    println!();
    println!("{} expense(s)", expenses.len());

    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_expense(id)?;
    println!("🗑️  Deleted expense #{}", id);
    Ok(())
}
