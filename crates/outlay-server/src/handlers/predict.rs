//! Health and prediction handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use outlay_core::models::Prediction;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_ready: bool,
    pub model_version: Option<u32>,
    pub model_accuracy: Option<f64>,
}

/// GET /api/health - Liveness and model status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let info = state.predictor.model_info();
    Json(HealthResponse {
        status: "ok",
        model_ready: state.predictor.is_ready(),
        model_version: info.map(|i| i.format_version),
        model_accuracy: info.and_then(|i| i.accuracy),
    })
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub description: String,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// POST /api/predict - Suggest a category for a description
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(body) = body.map_err(AppError::from_rejection)?;
    let prediction = state.predictor.predict(&body.description)?;

    Ok(Json(PredictResponse {
        description: body.description.trim().to_string(),
        prediction,
    }))
}
