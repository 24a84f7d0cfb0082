//! Expense ledger operations

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{column_category, column_date, format_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense, Period};

const EXPENSE_COLUMNS: &str = "id, description, amount, category, date, created_at";

fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
    let created_at_str: String = row.get(5)?;
    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: column_category(row, 3)?,
        date: column_date(row, 4)?,
        created_at: parse_datetime(&created_at_str),
    })
}

/// Expenses dated inside `period`, in insertion order
pub(super) fn query_in_period(conn: &Connection, period: &Period) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses
         WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date < ?2)
         ORDER BY id",
        EXPENSE_COLUMNS
    ))?;

    let start = period.start.map(format_date);
    let end = period.end.map(format_date);
    let expenses = stmt
        .query_map(params![start, end], row_to_expense)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(expenses)
}

impl Database {
    /// Record an expense. Invalid amounts or descriptions never reach the ledger.
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        expense.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (description, amount, category, date) VALUES (?, ?, ?, ?)",
            params![
                expense.description.trim(),
                expense.amount,
                expense.category.as_str(),
                format_date(expense.date),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, category = %expense.category, amount = expense.amount, "Recorded expense");
        Ok(id)
    }

    /// Get a single expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Most recent expenses first (by date, then by insertion)
    pub fn list_expenses(&self, limit: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses ORDER BY date DESC, id DESC LIMIT ?",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![limit], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Expenses dated inside a period, oldest first
    pub fn list_expenses_in(&self, period: &Period) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        query_in_period(&conn, period)
    }

    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete an expense; unknown IDs are reported as not found
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        debug!(id, "Deleted expense");
        Ok(())
    }
}
