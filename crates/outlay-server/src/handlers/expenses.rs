//! Expense ledger handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use outlay_core::models::{parse_date, Category, Expense, NewExpense};

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub description: String,
    pub amount: f64,
    /// Omit (or leave blank) to have the category predicted from the description
    pub category: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

/// How an expense's category was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    Manual,
    Predicted,
    /// Description too short to classify
    Default,
}

#[derive(Debug, Serialize)]
pub struct CreateExpenseResponse {
    pub expense: Expense,
    pub category_source: CategorySource,
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateExpenseResponse>), AppError> {
    let Json(body) = body.map_err(AppError::from_rejection)?;
    let date = match body.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    let mut expense = NewExpense {
        description: body.description,
        amount: body.amount,
        category: Category::Other,
        date,
    };
    // Reject bad input before spending time on prediction
    expense.validate()?;

    let requested = body
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let source = match requested {
        Some(name) => {
            expense.category = Category::parse(name)?;
            CategorySource::Manual
        }
        None => {
            expense.category = state
                .predictor
                .predict_or_default(&expense.description, Category::Other)?;
            let too_short = expense.description.trim().chars().count()
                < state.predictor.min_description_chars();
            if too_short {
                CategorySource::Default
            } else {
                CategorySource::Predicted
            }
        }
    };

    let id = state.db.insert_expense(&expense)?;
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::internal("Expense vanished after insert"))?;

    info!(id, category = %expense.category, source = ?source, "Expense recorded");

    Ok((
        StatusCode::CREATED,
        Json(CreateExpenseResponse {
            expense,
            category_source: source,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub count: usize,
}

/// GET /api/expenses - Most recent expenses first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListExpensesQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let expenses = state.db.list_expenses(limit)?;

    Ok(Json(ExpenseListResponse {
        count: expenses.len(),
        expenses,
    }))
}

/// GET /api/expenses/:id - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found(&format!("Expense {} not found", id)))?;
    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Remove an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_expense(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
