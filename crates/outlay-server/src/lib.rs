//! Outlay Web Server
//!
//! Axum-based REST API for recording expenses, predicting their category,
//! and reporting spend against budgets.
//!
//! The category model is loaded once before the router is built and shared
//! read-only by every request. Summaries, alerts and budget statuses are
//! recomputed from a fresh ledger snapshot on each call.

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use outlay_core::{BudgetAlertEvaluator, Database, EngineConfig, PredictionService};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Alert thresholds, input policy, display settings
    pub engine: EngineConfig,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub predictor: Arc<PredictionService>,
    pub evaluator: BudgetAlertEvaluator,
    pub config: ServerConfig,
}

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(
    db: Database,
    predictor: Arc<PredictionService>,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    match predictor.model_info() {
        Some(info) => info!(
            vocabulary = info.vocabulary_size,
            examples = info.training_examples,
            "Category model ready"
        ),
        None => warn!("⚠️  No category model loaded - predictions will return 503"),
    }

    let state = Arc::new(AppState {
        db,
        predictor,
        evaluator: BudgetAlertEvaluator::from_config(&config.engine),
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense).delete(handlers::delete_expense),
        )
        // Reports
        .route("/summary", get(handlers::get_summary))
        .route("/alerts", get(handlers::get_alerts))
        // Budgets
        .route("/budgets", get(handlers::list_budgets))
        .route("/budgets/status", get(handlers::budget_status))
        .route(
            "/budgets/:category",
            put(handlers::set_budget).delete(handlers::delete_budget),
        );

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    predictor: Arc<PredictionService>,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(db, predictor, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, msg)
    }

    pub fn unavailable(msg: &str) -> Self {
        Self::with_status(StatusCode::SERVICE_UNAVAILABLE, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Unreadable or mistyped request bodies are client errors, not short input
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        Self::bad_request(&rejection.body_text())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map engine errors to status codes; anything unexpected becomes a 500
    fn from_core(err: outlay_core::Error) -> Self {
        use outlay_core::Error;

        match err {
            Error::Validation(msg) => Self::bad_request(&msg),
            Error::NotFound(msg) => Self::not_found(&msg),
            e @ Error::InsufficientInput { .. } => Self::unprocessable(&e.to_string()),
            e @ Error::Configuration(_) => {
                warn!(error = %e, "Prediction unavailable");
                Self::unavailable("Category model is not available")
            }
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        match err.into().downcast::<outlay_core::Error>() {
            Ok(core) => Self::from_core(core),
            Err(err) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(err),
            },
        }
    }
}

#[cfg(test)]
mod tests;
