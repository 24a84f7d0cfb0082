//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::reports::PeriodQuery;
use crate::{AppError, AppState, SuccessResponse};
use outlay_core::aggregate;
use outlay_core::models::{Budget, BudgetMap, BudgetStatus, Category};

#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub limit: f64,
}

/// PUT /api/budgets/:category - Set a monthly limit (replaces any existing one)
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    body: Result<Json<SetBudgetRequest>, JsonRejection>,
) -> Result<Json<Budget>, AppError> {
    let Json(body) = body.map_err(AppError::from_rejection)?;
    let budget = Budget::new(Category::parse(&category)?, body.limit)?;
    state.db.set_budget(&budget)?;
    Ok(Json(budget))
}

/// GET /api/budgets - All budgets as `{category: limit}`
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BudgetMap>, AppError> {
    Ok(Json(state.db.list_budgets()?))
}

/// DELETE /api/budgets/:category - Remove a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_budget(Category::parse(&category)?)?;
    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Serialize)]
pub struct BudgetStatusResponse {
    pub statuses: Vec<BudgetStatus>,
    pub label: String,
}

/// GET /api/budgets/status - Tier, spend and remaining amount per budget
pub async fn budget_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<BudgetStatusResponse>, AppError> {
    let period = params.resolve()?;
    let snapshot = state.db.snapshot(&period)?;
    let summary = aggregate(&snapshot.expenses, &period);

    Ok(Json(BudgetStatusResponse {
        statuses: state
            .evaluator
            .statuses(&summary.by_category, &snapshot.budgets),
        label: period.label(),
    }))
}
