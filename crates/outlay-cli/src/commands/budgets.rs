//! Budget command implementations

use anyhow::Result;
use outlay_core::models::{Budget, Category, Period, Tier};
use outlay_core::{aggregate, BudgetAlertEvaluator, Database};

pub fn cmd_budget_set(
    db: &Database,
    evaluator: &BudgetAlertEvaluator,
    category: &str,
    limit: f64,
) -> Result<()> {
    let budget = Budget::new(Category::parse(category)?, limit)?;
    db.set_budget(&budget)?;
    println!(
        "✅ {} budget set to {} per month",
        budget.category,
        evaluator.format_money(budget.monthly_limit)
    );
    Ok(())
}

pub fn cmd_budget_remove(db: &Database, category: &str) -> Result<()> {
    let category = Category::parse(category)?;
    db.delete_budget(category)?;
    println!("🗑️  Removed {} budget", category);
    Ok(())
}

/// Every budget with its status for the period
pub fn cmd_budget_list(
    db: &Database,
    evaluator: &BudgetAlertEvaluator,
    period: &Period,
) -> Result<()> {
    let snapshot = db.snapshot(period)?;

    if snapshot.budgets.is_empty() {
        println!("No budgets set. Use: outlay budget set <category> <limit>");
        return Ok(());
    }

    let summary = aggregate(&snapshot.expenses, period);
    let statuses = evaluator.statuses(&summary.by_category, &snapshot.budgets);

    println!();
    println!("💰 Budgets - {}", period.label());
    println!(
        "   {:15} │ {:>12} │ {:>12} │ {:>6} │ {:>12} │ Status",
        "Category", "Limit", "Spent", "Used", "Remaining"
    );
    println!("   ────────────────┼──────────────┼──────────────┼────────┼──────────────┼────────");
    for s in &statuses {
        let icon = match s.tier {
            Tier::Safe => "🟢",
            Tier::Warning => "🟡",
            Tier::Danger => "🔴",
        };
        println!(
            "   {:15} │ {:>12} │ {:>12} │ {:>5.0}% │ {:>12} │ {} {}",
            s.category.as_str(),
            evaluator.format_money(s.budget),
            evaluator.format_money(s.spent),
            s.percent_used,
            evaluator.format_money(s.remaining),
            icon,
            s.tier
        );
    }

    Ok(())
}
