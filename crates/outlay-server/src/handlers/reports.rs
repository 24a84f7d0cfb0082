//! Spend summary and budget alert handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use outlay_core::aggregate;
use outlay_core::models::{Alert, Period, SpendSummary};

/// Query parameters selecting a reporting period
///
/// `period` is a named range (this-month, last-month, this-year,
/// last-30-days, all); `from`/`to` give an explicit inclusive range.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> Result<Period, AppError> {
        Ok(Period::resolve(
            self.period.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
            Utc::now().date_naive(),
        )?)
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: SpendSummary,
    pub period: Period,
    pub label: String,
}

/// GET /api/summary - Total and per-category spend for a period
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let period = params.resolve()?;
    let snapshot = state.db.snapshot(&period)?;

    Ok(Json(SummaryResponse {
        summary: aggregate(&snapshot.expenses, &period),
        label: period.label(),
        period,
    }))
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
    pub count: usize,
    pub label: String,
}

/// GET /api/alerts - Budget alerts for a period, most urgent first
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<AlertsResponse>, AppError> {
    let period = params.resolve()?;
    let snapshot = state.db.snapshot(&period)?;
    let summary = aggregate(&snapshot.expenses, &period);
    let alerts = state
        .evaluator
        .evaluate(&summary.by_category, &snapshot.budgets);

    Ok(Json(AlertsResponse {
        count: alerts.len(),
        alerts,
        label: period.label(),
    }))
}
