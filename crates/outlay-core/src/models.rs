//! Domain models for Outlay

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spending category
///
/// The set is closed and its declaration order is the tie-break order used
/// everywhere (classification arg-max, top category, alert ordering). `Ord`
/// is derived so `BTreeMap<Category, _>` iterates in that order too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Other,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 6;

    /// All categories in tie-break order
    pub const ALL: [Category; Category::COUNT] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Bills,
        Self::Entertainment,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }

    /// Position in [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Parse a category name, rejecting unknown names as a validation error
    pub fn parse(s: &str) -> Result<Self> {
        s.parse().map_err(Error::Validation)
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "shopping" => Ok(Self::Shopping),
            "bills" => Ok(Self::Bills),
            "entertainment" => Ok(Self::Entertainment),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    /// Always positive
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A new expense to be recorded (before DB insertion)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

impl NewExpense {
    /// Boundary validation; nothing invalid is written to the ledger
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount, "Amount")?;
        if self.description.trim().is_empty() {
            return Err(Error::Validation(
                "Description cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that a money value is finite and strictly positive
pub fn validate_amount(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Validation(format!(
            "{} must be positive (got {})",
            what, value
        )));
    }
    Ok(())
}

/// A monthly budget for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,
    pub monthly_limit: f64,
}

impl Budget {
    pub fn new(category: Category, monthly_limit: f64) -> Result<Self> {
        validate_amount(monthly_limit, "Budget limit")?;
        Ok(Self {
            category,
            monthly_limit,
        })
    }
}

/// Configured budgets, at most one per category
pub type BudgetMap = BTreeMap<Category, f64>;

/// Spend per category for a period. Zero-spend categories are absent.
pub type CategorySpend = BTreeMap<Category, f64>;

/// Half-open date range `[start, end)`; `None` means unbounded on that side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    /// The calendar month containing `date`
    pub fn month_containing(date: NaiveDate) -> Self {
        let start = date.with_day(1);
        Self {
            start,
            end: start.and_then(first_of_next_month),
        }
    }

    /// Inclusive date range
    pub fn between(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if to < from {
            return Err(Error::Validation(format!(
                "Period end {} is before start {}",
                to, from
            )));
        }
        Ok(Self {
            start: Some(from),
            end: to.succ_opt(),
        })
    }

    /// Every date
    pub fn all_time() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date < e)
    }

    /// Resolve a named period or explicit `from`/`to` dates (YYYY-MM-DD, inclusive)
    ///
    /// Names: this-month (default), last-month, this-year, last-30-days, all
    pub fn resolve(
        name: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self> {
        match (from, to) {
            (Some(from), Some(to)) => return Self::between(parse_date(from)?, parse_date(to)?),
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::Validation(
                    "Both 'from' and 'to' are required for a custom period".to_string(),
                ))
            }
            (None, None) => {}
        }

        match name.unwrap_or("this-month").to_lowercase().as_str() {
            "this-month" => Ok(Self::month_containing(today)),
            "last-month" => {
                let this_month = Self::month_containing(today);
                let start = this_month
                    .start
                    .and_then(|s| s.pred_opt())
                    .and_then(|d| d.with_day(1));
                Ok(Self {
                    start,
                    end: this_month.start,
                })
            }
            "this-year" => Ok(Self {
                start: NaiveDate::from_ymd_opt(today.year(), 1, 1),
                end: NaiveDate::from_ymd_opt(today.year() + 1, 1, 1),
            }),
            "last-30-days" => Ok(Self {
                start: Some(today - Duration::days(29)),
                end: today.succ_opt(),
            }),
            "all" => Ok(Self::all_time()),
            other => Err(Error::Validation(format!(
                "Unknown period: {}. Available: this-month, last-month, this-year, last-30-days, all",
                other
            ))),
        }
    }

    /// Human readable label, e.g. "October 2026"
    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All time".to_string(),
            (Some(start), Some(end))
                if start.day() == 1 && first_of_next_month(start) == Some(end) =>
            {
                start.format("%B %Y").to_string()
            }
            (start, end) => {
                let from = start.map_or_else(|| "beginning".to_string(), |d| d.to_string());
                let to = end
                    .and_then(|d| d.pred_opt())
                    .map_or_else(|| "now".to_string(), |d| d.to_string());
                format!("{} to {}", from, to)
            }
        }
    }
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("Invalid date '{}' (use YYYY-MM-DD)", s)))
}

/// Aggregated spend for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendSummary {
    pub total_spent: f64,
    pub by_category: CategorySpend,
    pub expense_count: usize,
    pub top_category: Option<Category>,
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget status tier, ordered Safe < Warning < Danger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Safe,
    Warning,
    Danger,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Alert severity for this tier, if it alerts at all
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Safe => None,
            Self::Warning => Some(Severity::Warning),
            Self::Danger => Some(Severity::Danger),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A budget alert. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub category: Category,
    pub severity: Severity,
    pub spent: f64,
    pub budget: f64,
    /// spent / budget * 100
    pub percent_used: f64,
    /// Amount over the limit (0 for warnings)
    pub exceeded_by: f64,
    pub message: String,
}

/// Status of one budgeted category, including safe ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub tier: Tier,
    pub spent: f64,
    pub budget: f64,
    pub percent_used: f64,
    /// Negative when over budget
    pub remaining: f64,
}

/// Result of classifying one description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category: Category,
    /// Probability per category, summing to 1
    pub confidence: BTreeMap<Category, f64>,
    pub top_confidence: f64,
    /// Number of distinct description terms found in the vocabulary
    pub known_terms: usize,
}
