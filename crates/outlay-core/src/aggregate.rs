//! Spend aggregation over a ledger snapshot

use crate::models::{Category, CategorySpend, Expense, Period, SpendSummary};

/// Total and per-category spend for expenses dated inside `period`
///
/// Categories without spend are left out of `by_category`. The top category
/// is the largest subtotal, ties going to the earlier category.
pub fn aggregate(ledger: &[Expense], period: &Period) -> SpendSummary {
    let mut by_category = CategorySpend::new();
    let mut total_spent = 0.0;
    let mut expense_count = 0;

    for expense in ledger.iter().filter(|e| period.contains(e.date)) {
        *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
        total_spent += expense.amount;
        expense_count += 1;
    }

    SpendSummary {
        total_spent,
        top_category: top_category(&by_category),
        by_category,
        expense_count,
    }
}

/// Largest subtotal; BTreeMap iteration follows category order, so keeping
/// the first maximum breaks ties correctly
pub fn top_category(by_category: &CategorySpend) -> Option<Category> {
    let mut best: Option<(Category, f64)> = None;
    for (&category, &spent) in by_category {
        match best {
            Some((_, top)) if spent <= top => {}
            _ => best = Some((category, spent)),
        }
    }
    best.map(|(category, _)| category)
}
