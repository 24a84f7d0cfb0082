//! Budget alert evaluation
//!
//! The only place budget tiers are derived. Every consumer (alerts endpoint,
//! budget status, CLI) goes through [`BudgetAlertEvaluator`] so displayed
//! statuses can never drift from emitted alerts.

use std::cmp::Ordering;

use tracing::warn;

use crate::config::{AlertThresholds, EngineConfig};
use crate::models::{Alert, BudgetMap, BudgetStatus, Category, CategorySpend, Tier};

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAlertEvaluator {
    thresholds: AlertThresholds,
    currency_symbol: String,
}

impl Default for BudgetAlertEvaluator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl BudgetAlertEvaluator {
    pub fn new(thresholds: AlertThresholds, currency_symbol: impl Into<String>) -> Self {
        Self {
            thresholds,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.alerts, config.currency_symbol.clone())
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Tier for a spend-to-limit ratio
    pub fn tier(&self, pct: f64) -> Tier {
        if pct >= self.thresholds.danger_ratio {
            Tier::Danger
        } else if pct >= self.thresholds.warning_ratio {
            Tier::Warning
        } else {
            Tier::Safe
        }
    }

    /// Status of every budgeted category, in category order
    ///
    /// Malformed limits are logged and skipped; they never block the others.
    pub fn statuses(&self, spend: &CategorySpend, budgets: &BudgetMap) -> Vec<BudgetStatus> {
        let mut statuses = Vec::with_capacity(budgets.len());

        for (&category, &limit) in budgets {
            if !limit.is_finite() || limit <= 0.0 {
                warn!(category = %category, limit, "Skipping malformed budget");
                continue;
            }

            let spent = spend.get(&category).copied().unwrap_or(0.0);
            let pct = if spent == 0.0 { 0.0 } else { spent / limit };

            statuses.push(BudgetStatus {
                category,
                tier: self.tier(pct),
                spent,
                budget: limit,
                percent_used: pct * 100.0,
                remaining: limit - spent,
            });
        }

        statuses
    }

    /// Alerts for budgeted categories at warning or danger, most urgent first
    pub fn evaluate(&self, spend: &CategorySpend, budgets: &BudgetMap) -> Vec<Alert> {
        let mut statuses = self.statuses(spend, budgets);
        statuses.sort_by(by_urgency);
        statuses
            .iter()
            .filter_map(|status| self.alert_for(status))
            .collect()
    }

    fn alert_for(&self, status: &BudgetStatus) -> Option<Alert> {
        let severity = status.tier.severity()?;
        let over = (status.spent - status.budget).max(0.0);

        let message = match status.tier {
            Tier::Danger if over > 0.0 => format!(
                "{} budget exceeded by {} (spent {} of {})",
                status.category,
                self.format_money(over),
                self.format_money(status.spent),
                self.format_money(status.budget)
            ),
            Tier::Danger => format!(
                "{} has reached {:.0}% of budget ({} of {})",
                status.category,
                status.percent_used,
                self.format_money(status.spent),
                self.format_money(status.budget)
            ),
            _ => format!(
                "{} is at {:.0}% of budget ({} of {})",
                status.category,
                status.percent_used,
                self.format_money(status.spent),
                self.format_money(status.budget)
            ),
        };

        Some(Alert {
            category: status.category,
            severity,
            spent: status.spent,
            budget: status.budget,
            percent_used: status.percent_used,
            exceeded_by: if status.tier == Tier::Danger { over } else { 0.0 },
            message,
        })
    }

    /// Whole currency units with thousands separators, e.g. `₹12,500`
    pub fn format_money(&self, amount: f64) -> String {
        format!("{}{}", self.currency_symbol, group_thousands(amount))
    }
}

fn group_thousands(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Compare two statuses by urgency (higher ratio first, then category order)
pub fn by_urgency(a: &BudgetStatus, b: &BudgetStatus) -> Ordering {
    b.percent_used
        .total_cmp(&a.percent_used)
        .then_with(|| a.category.cmp(&b.category))
}

/// Categories that have spend but no budget
pub fn unbudgeted(spend: &CategorySpend, budgets: &BudgetMap) -> Vec<Category> {
    spend
        .keys()
        .filter(|c| !budgets.contains_key(c))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn spend(entries: &[(Category, f64)]) -> CategorySpend {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_warning_at_ninety_percent() {
        let evaluator = BudgetAlertEvaluator::default();
        let alerts = evaluator.evaluate(
            &spend(&[(Category::Food, 4500.0)]),
            &spend(&[(Category::Food, 5000.0)]),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert!((alerts[0].percent_used - 90.0).abs() < 1e-9);
        assert_eq!(alerts[0].exceeded_by, 0.0);
        assert_eq!(alerts[0].message, "Food is at 90% of budget (₹4,500 of ₹5,000)");
    }

    #[test]
    fn test_danger_when_over_budget() {
        let evaluator = BudgetAlertEvaluator::default();
        let alerts = evaluator.evaluate(
            &spend(&[(Category::Food, 4500.0)]),
            &spend(&[(Category::Food, 4000.0)]),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Danger);
        assert_eq!(alerts[0].exceeded_by, 500.0);
        assert_eq!(
            alerts[0].message,
            "Food budget exceeded by ₹500 (spent ₹4,500 of ₹4,000)"
        );
    }

    #[test]
    fn test_exactly_at_limit_is_danger() {
        let evaluator = BudgetAlertEvaluator::default();
        let alerts = evaluator.evaluate(
            &spend(&[(Category::Bills, 2000.0)]),
            &spend(&[(Category::Bills, 2000.0)]),
        );
        assert_eq!(alerts[0].severity, Severity::Danger);
        assert_eq!(alerts[0].exceeded_by, 0.0);
        assert!(alerts[0].message.contains("reached 100%"));
    }

    #[test]
    fn test_unbudgeted_spend_never_alerts() {
        let evaluator = BudgetAlertEvaluator::default();
        let by_category = spend(&[(Category::Shopping, 1_000_000.0), (Category::Food, 10.0)]);
        let budgets = spend(&[(Category::Food, 5000.0)]);

        assert!(evaluator.evaluate(&by_category, &budgets).is_empty());
        assert!(evaluator.evaluate(&by_category, &BudgetMap::new()).is_empty());
        assert_eq!(unbudgeted(&by_category, &budgets), vec![Category::Shopping]);
    }

    #[test]
    fn test_orders_by_pct_then_category() {
        let evaluator = BudgetAlertEvaluator::default();
        let by_category = spend(&[
            (Category::Food, 850.0),
            (Category::Transport, 1200.0),
            (Category::Bills, 85.0),
            (Category::Other, 90.0),
        ]);
        let budgets = spend(&[
            (Category::Food, 1000.0),
            (Category::Transport, 1000.0),
            (Category::Bills, 100.0),
            (Category::Other, 100.0),
        ]);

        let order: Vec<Category> = evaluator
            .evaluate(&by_category, &budgets)
            .iter()
            .map(|a| a.category)
            .collect();
        assert_eq!(
            order,
            vec![
                Category::Transport,
                Category::Other,
                Category::Food,
                Category::Bills
            ]
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let evaluator = BudgetAlertEvaluator::default();
        let by_category = spend(&[(Category::Food, 900.0), (Category::Bills, 1500.0)]);
        let budgets = spend(&[(Category::Food, 1000.0), (Category::Bills, 1000.0)]);

        let first = evaluator.evaluate(&by_category, &budgets);
        let second = evaluator.evaluate(&by_category, &budgets);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tier_is_monotone_in_spend() {
        let evaluator = BudgetAlertEvaluator::default();
        let budgets = spend(&[(Category::Food, 1000.0)]);

        let mut previous = Tier::Safe;
        for step in 0..=300 {
            let spent = step as f64 * 5.0;
            let statuses = evaluator.statuses(&spend(&[(Category::Food, spent)]), &budgets);
            let tier = statuses[0].tier;
            assert!(tier >= previous, "tier dropped at spent={}", spent);
            previous = tier;
        }
        assert_eq!(previous, Tier::Danger);
    }

    #[test]
    fn test_statuses_include_safe_and_zero_spend() {
        let evaluator = BudgetAlertEvaluator::default();
        let statuses = evaluator.statuses(
            &spend(&[(Category::Food, 100.0)]),
            &spend(&[(Category::Food, 1000.0), (Category::Bills, 500.0)]),
        );

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].category, Category::Food);
        assert_eq!(statuses[0].tier, Tier::Safe);
        assert_eq!(statuses[0].remaining, 900.0);
        assert_eq!(statuses[1].category, Category::Bills);
        assert_eq!(statuses[1].spent, 0.0);
        assert_eq!(statuses[1].percent_used, 0.0);
    }

    #[test]
    fn test_malformed_budget_is_skipped() {
        let evaluator = BudgetAlertEvaluator::default();
        let by_category = spend(&[(Category::Food, 900.0), (Category::Bills, 900.0)]);
        let budgets = spend(&[(Category::Food, 0.0), (Category::Bills, 1000.0)]);

        let alerts = evaluator.evaluate(&by_category, &budgets);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, Category::Bills);
    }

    #[test]
    fn test_custom_thresholds() {
        let evaluator =
            BudgetAlertEvaluator::new(AlertThresholds::new(0.5, 0.9).unwrap(), "$");
        assert_eq!(evaluator.tier(0.49), Tier::Safe);
        assert_eq!(evaluator.tier(0.5), Tier::Warning);
        assert_eq!(evaluator.tier(0.9), Tier::Danger);
        assert_eq!(evaluator.format_money(1234.4), "$1,234");
    }

    #[test]
    fn test_format_money() {
        let evaluator = BudgetAlertEvaluator::default();
        assert_eq!(evaluator.format_money(0.0), "₹0");
        assert_eq!(evaluator.format_money(999.5), "₹1,000");
        assert_eq!(evaluator.format_money(1234567.0), "₹1,234,567");
        assert_eq!(evaluator.format_money(-2500.0), "₹-2,500");
    }

    #[test]
    fn test_by_urgency() {
        let evaluator = BudgetAlertEvaluator::default();
        let mut statuses = evaluator.statuses(
            &spend(&[(Category::Food, 100.0), (Category::Bills, 900.0)]),
            &spend(&[(Category::Food, 1000.0), (Category::Bills, 1000.0)]),
        );
        statuses.sort_by(by_urgency);
        assert_eq!(statuses[0].category, Category::Bills);
    }
}
