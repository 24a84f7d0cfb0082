//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use outlay_core::models::{Budget, Category, NewExpense};
use outlay_core::{builtin_corpus, ModelBundle};
use tower::ServiceExt;

fn trained_predictor() -> Arc<PredictionService> {
    let bundle = ModelBundle::fit(&builtin_corpus(), 1.0).unwrap();
    Arc::new(PredictionService::new(bundle, 3))
}

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, trained_predictor(), None, ServerConfig::default())
}

fn setup_test_app_with_db(db: Database) -> Router {
    create_router(db, trained_predictor(), None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn record(db: &Database, description: &str, amount: f64, category: Category) {
    db.insert_expense(&NewExpense {
        description: description.to_string(),
        amount,
        category,
        date: Utc::now().date_naive(),
    })
    .unwrap();
}

// ========== Health & Prediction ==========

#[tokio::test]
async fn test_health_reports_model() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_ready"], true);
    assert_eq!(json["model_version"], 1);
}

#[tokio::test]
async fn test_predict() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/predict",
            serde_json::json!({ "description": "Uber ride to airport" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "Transport");
    assert_eq!(json["description"], "Uber ride to airport");
    assert!(json["top_confidence"].as_f64().unwrap() > 1.0 / 6.0);

    let confidence = json["confidence"].as_object().unwrap();
    assert_eq!(confidence.len(), 6);
    let sum: f64 = confidence.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_short_description_is_422() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/predict",
            serde_json::json!({ "description": "ab" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("at least 3"));
}

#[tokio::test]
async fn test_predict_malformed_body_is_400() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/predict", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("description"));
}

#[tokio::test]
async fn test_predict_non_json_body_is_400() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_predict_without_model_is_503() {
    let db = Database::in_memory().unwrap();
    let app = create_router(
        db,
        Arc::new(PredictionService::unloaded(3)),
        None,
        ServerConfig::default(),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/predict",
            serde_json::json!({ "description": "Uber ride to airport" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ========== Expenses ==========

#[tokio::test]
async fn test_create_expense_with_category() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/expenses",
            serde_json::json!({
                "description": "Team lunch",
                "amount": 1200.0,
                "category": "food",
                "date": "2026-10-05"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["expense"]["category"], "Food");
    assert_eq!(json["expense"]["date"], "2026-10-05");
    assert_eq!(json["category_source"], "manual");
    assert!(json["expense"]["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_expense_predicts_category() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/expenses",
            serde_json::json!({ "description": "Uber ride to airport", "amount": 450.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["expense"]["category"], "Transport");
    assert_eq!(json["category_source"], "predicted");
}

#[tokio::test]
async fn test_create_expense_short_description_defaults_to_other() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/expenses",
            serde_json::json!({ "description": "tp", "amount": 20.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["expense"]["category"], "Other");
    assert_eq!(json["category_source"], "default");
}

#[tokio::test]
async fn test_create_expense_rejects_bad_input() {
    let cases = [
        serde_json::json!({ "description": "lunch", "amount": 0.0, "category": "Food" }),
        serde_json::json!({ "description": "lunch", "amount": -10.0, "category": "Food" }),
        serde_json::json!({ "description": "lunch", "amount": 10.0, "category": "Groceries" }),
        serde_json::json!({ "description": "lunch", "amount": 10.0, "date": "16/10/2026" }),
        // Malformed bodies
        serde_json::json!({ "description": "lunch", "amount": "abc" }),
        serde_json::json!({ "amount": 10.0 }),
        serde_json::json!({}),
    ];

    for body in cases {
        let app = setup_test_app();
        let response = app
            .oneshot(json_request("POST", "/api/expenses", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let json = get_body_json(response).await;
        assert!(json["error"].is_string(), "body: {}", body);
    }
}

#[tokio::test]
async fn test_create_expense_blank_category_is_predicted() {
    for category in ["", "   "] {
        let app = setup_test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/expenses",
                serde_json::json!({
                    "description": "Uber ride to airport",
                    "amount": 450.0,
                    "category": category
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = get_body_json(response).await;
        assert_eq!(json["expense"]["category"], "Transport");
        assert_eq!(json["category_source"], "predicted");
    }
}

#[tokio::test]
async fn test_list_and_delete_expenses() {
    let db = Database::in_memory().unwrap();
    record(&db, "coffee", 150.0, Category::Food);
    record(&db, "bus pass", 600.0, Category::Transport);

    let app = setup_test_app_with_db(db.clone());
    let response = app.oneshot(get_request("/api/expenses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["count"], 2);
    let id = json["expenses"][0]["id"].as_i64().unwrap();

    let app = setup_test_app_with_db(db.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/expenses/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(db.count_expenses().unwrap(), 1);

    let app = setup_test_app_with_db(db);
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/expenses/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Budgets ==========

#[tokio::test]
async fn test_set_and_list_budgets() {
    let db = Database::in_memory().unwrap();

    let app = setup_test_app_with_db(db.clone());
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/budgets/Food",
            serde_json::json!({ "limit": 5000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Last write wins
    let app = setup_test_app_with_db(db.clone());
    app.oneshot(json_request(
        "PUT",
        "/api/budgets/food",
        serde_json::json!({ "limit": 4000.0 }),
    ))
    .await
    .unwrap();

    let app = setup_test_app_with_db(db);
    let response = app.oneshot(get_request("/api/budgets")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!({ "Food": 4000.0 }));
}

#[tokio::test]
async fn test_set_budget_validation() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/budgets/Food",
            serde_json::json!({ "limit": 0.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/budgets/Travel",
            serde_json::json!({ "limit": 100.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/budgets/Food",
            serde_json::json!({ "limit": "lots" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_delete_budget() {
    let db = Database::in_memory().unwrap();
    db.set_budget(&Budget::new(Category::Bills, 2000.0).unwrap())
        .unwrap();

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/api/budgets/Bills")
            .body(Body::empty())
            .unwrap()
    };

    let response = setup_test_app_with_db(db.clone())
        .oneshot(delete())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = setup_test_app_with_db(db).oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_budget_status_lists_every_budget() {
    let db = Database::in_memory().unwrap();
    record(&db, "groceries", 4500.0, Category::Food);
    db.set_budget(&Budget::new(Category::Food, 5000.0).unwrap())
        .unwrap();
    db.set_budget(&Budget::new(Category::Bills, 2000.0).unwrap())
        .unwrap();

    let app = setup_test_app_with_db(db);
    let response = app
        .oneshot(get_request("/api/budgets/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let statuses = json["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["category"], "Food");
    assert_eq!(statuses[0]["tier"], "warning");
    assert_eq!(statuses[1]["category"], "Bills");
    assert_eq!(statuses[1]["tier"], "safe");
}

// ========== Reports ==========

#[tokio::test]
async fn test_summary_current_month() {
    let db = Database::in_memory().unwrap();
    record(&db, "pizza", 100.0, Category::Food);
    record(&db, "burger", 50.0, Category::Food);
    record(&db, "metro", 30.0, Category::Transport);

    let app = setup_test_app_with_db(db);
    let response = app.oneshot(get_request("/api/summary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total_spent"], 180.0);
    assert_eq!(json["expense_count"], 3);
    assert_eq!(json["top_category"], "Food");
    assert_eq!(json["by_category"]["Food"], 150.0);
    assert_eq!(json["by_category"]["Transport"], 30.0);
    assert!(json["by_category"].get("Bills").is_none());
    assert!(json["label"].is_string());
}

#[tokio::test]
async fn test_summary_empty_ledger() {
    let app = setup_test_app();
    let response = app
        .oneshot(get_request("/api/summary?period=all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total_spent"], 0.0);
    assert_eq!(json["expense_count"], 0);
    assert!(json["top_category"].is_null());
    assert_eq!(json["label"], "All time");
}

#[tokio::test]
async fn test_summary_rejects_bad_period() {
    for uri in [
        "/api/summary?period=fortnight",
        "/api/summary?from=2026-10-01",
        "/api/summary?from=2026-10-10&to=2026-10-01",
    ] {
        let response = setup_test_app().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_alerts_tiers() {
    let db = Database::in_memory().unwrap();
    record(&db, "groceries", 4500.0, Category::Food);
    record(&db, "electricity", 2500.0, Category::Bills);
    record(&db, "shoes", 9000.0, Category::Shopping);
    db.set_budget(&Budget::new(Category::Food, 5000.0).unwrap())
        .unwrap();
    db.set_budget(&Budget::new(Category::Bills, 2000.0).unwrap())
        .unwrap();

    let app = setup_test_app_with_db(db);
    let response = app.oneshot(get_request("/api/alerts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["count"], 2);

    // Bills at 125% comes before Food at 90%; Shopping has no budget
    let alerts = json["alerts"].as_array().unwrap();
    assert_eq!(alerts[0]["category"], "Bills");
    assert_eq!(alerts[0]["severity"], "danger");
    assert_eq!(alerts[0]["exceeded_by"], 500.0);
    assert_eq!(alerts[1]["category"], "Food");
    assert_eq!(alerts[1]["severity"], "warning");
    assert_eq!(
        alerts[1]["message"],
        "Food is at 90% of budget (₹4,500 of ₹5,000)"
    );
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();
    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}
