//! Budget operations

use rusqlite::{params, Connection};
use tracing::{debug, warn};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetMap, Category};

/// Every stored budget keyed by category
///
/// Rows with an unrecognised category name are skipped rather than failing
/// the whole read.
pub(super) fn query_all(conn: &Connection) -> Result<BudgetMap> {
    let mut stmt = conn.prepare("SELECT category, monthly_limit FROM budgets")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut budgets = BudgetMap::new();
    for (name, limit) in rows {
        match name.parse::<Category>() {
            Ok(category) => {
                budgets.insert(category, limit);
            }
            Err(e) => warn!(category = %name, "Ignoring stored budget: {}", e),
        }
    }
    Ok(budgets)
}

impl Database {
    /// Set a category's monthly limit, replacing any existing one
    pub fn set_budget(&self, budget: &Budget) -> Result<()> {
        // Re-check; callers may build the struct directly
        let budget = Budget::new(budget.category, budget.monthly_limit)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (category, monthly_limit) VALUES (?, ?)
            ON CONFLICT(category) DO UPDATE SET
                monthly_limit = excluded.monthly_limit,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![budget.category.as_str(), budget.monthly_limit],
        )?;

        debug!(category = %budget.category, limit = budget.monthly_limit, "Set budget");
        Ok(())
    }

    pub fn get_budget(&self, category: Category) -> Result<Option<f64>> {
        Ok(self.list_budgets()?.get(&category).copied())
    }

    /// All configured budgets
    pub fn list_budgets(&self) -> Result<BudgetMap> {
        let conn = self.conn()?;
        query_all(&conn)
    }

    /// Remove a category's budget
    pub fn delete_budget(&self, category: Category) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE category = ?",
            params![category.as_str()],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("No budget set for {}", category)));
        }
        debug!(category = %category, "Deleted budget");
        Ok(())
    }
}
