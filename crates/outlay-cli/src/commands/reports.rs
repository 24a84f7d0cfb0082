//! Report command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use outlay_core::models::Period;
use outlay_core::alerts::unbudgeted;
use outlay_core::{aggregate, BudgetAlertEvaluator, Database, Severity};

/// Resolve a named period or custom --from/--to range
pub fn resolve_period(
    period: &str,
    custom_from: Option<&str>,
    custom_to: Option<&str>,
) -> Result<Period> {
    Period::resolve(
        Some(period),
        custom_from,
        custom_to,
        Utc::now().date_naive(),
    )
    .context("Invalid period")
}

pub fn cmd_summary(
    db: &Database,
    evaluator: &BudgetAlertEvaluator,
    period: &Period,
    json: bool,
) -> Result<()> {
    let snapshot = db.snapshot(period)?;
    let summary = aggregate(&snapshot.expenses, period);

    if json {
        let value = serde_json::json!({
            "label": period.label(),
            "period": period,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("📊 Spending Summary - {}", period.label());
    println!("   ─────────────────────────────────────────");

    if summary.expense_count == 0 {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!(
        "   Total: {} across {} expense(s)",
        evaluator.format_money(summary.total_spent),
        summary.expense_count
    );
    if let Some(top) = summary.top_category {
        println!("   Top category: {}", top);
    }
    println!();
    println!("   {:15} │ {:>12} │ {:>6}", "Category", "Amount", "%");
    println!("   ────────────────┼──────────────┼───────");
    for (category, amount) in &summary.by_category {
        println!(
            "   {:15} │ {:>12} │ {:>5.1}%",
            category.as_str(),
            evaluator.format_money(*amount),
            amount / summary.total_spent * 100.0
        );
    }

    Ok(())
}

pub fn cmd_alerts(
    db: &Database,
    evaluator: &BudgetAlertEvaluator,
    period: &Period,
    json: bool,
) -> Result<()> {
    let snapshot = db.snapshot(period)?;
    let summary = aggregate(&snapshot.expenses, period);
    let alerts = evaluator.evaluate(&summary.by_category, &snapshot.budgets);

    if json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    println!();
    println!("🔔 Budget Alerts - {}", period.label());

    if alerts.is_empty() {
        if snapshot.budgets.is_empty() {
            println!("   No budgets set. Use: outlay budget set <category> <limit>");
        } else {
            println!("   ✅ All categories within budget.");
            print_unbudgeted(&summary.by_category, &snapshot.budgets);
        }
        return Ok(());
    }

    for alert in &alerts {
        let icon = match alert.severity {
            Severity::Danger => "🔴",
            Severity::Warning => "🟡",
        };
        println!("   {} {}", icon, alert.message);
    }

    print_unbudgeted(&summary.by_category, &snapshot.budgets);

    Ok(())
}

fn print_unbudgeted(spend: &outlay_core::CategorySpend, budgets: &outlay_core::BudgetMap) {
    let missing = unbudgeted(spend, budgets);
    if missing.is_empty() {
        return;
    }
    let names: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
    println!();
    println!("   ℹ️  Spending without a budget: {}", names.join(", "));
}
