//! Integration tests for outlay-core
//!
//! These tests exercise the record → aggregate → alert workflow and the
//! train → save → load → predict workflow end to end.

use chrono::NaiveDate;
use outlay_core::{
    aggregate, builtin_corpus, train_and_evaluate, Budget, BudgetAlertEvaluator, Category,
    Database, Error, ModelBundle, NewExpense, Period, PredictionService, Severity,
    TrainingOptions,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(db: &Database, description: &str, amount: f64, category: Category, on: NaiveDate) {
    db.insert_expense(&NewExpense {
        description: description.to_string(),
        amount,
        category,
        date: on,
    })
    .expect("Failed to insert expense");
}

// =============================================================================
// Ledger → Summary → Alerts
// =============================================================================

#[test]
fn test_ledger_to_alerts_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let today = date(2026, 10, 16);

    record(&db, "groceries", 2500.0, Category::Food, date(2026, 10, 2));
    record(&db, "restaurant dinner", 2000.0, Category::Food, date(2026, 10, 9));
    record(&db, "metro card", 300.0, Category::Transport, date(2026, 10, 3));
    // Previous month, outside the period
    record(&db, "big dinner", 9000.0, Category::Food, date(2026, 9, 20));

    db.set_budget(&Budget::new(Category::Food, 5000.0).unwrap())
        .unwrap();

    let snapshot = db.snapshot(&Period::month_containing(today)).unwrap();
    let summary = aggregate(&snapshot.expenses, &snapshot.period);
    assert_eq!(summary.total_spent, 4800.0);
    assert_eq!(summary.by_category[&Category::Food], 4500.0);
    assert_eq!(summary.top_category, Some(Category::Food));

    let evaluator = BudgetAlertEvaluator::default();
    let alerts = evaluator.evaluate(&summary.by_category, &snapshot.budgets);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].category, Category::Food);
    assert_eq!(alerts[0].severity, Severity::Warning);

    // Tightening the budget mid-period applies to the whole period
    db.set_budget(&Budget::new(Category::Food, 4000.0).unwrap())
        .unwrap();
    let snapshot = db.snapshot(&Period::month_containing(today)).unwrap();
    let summary = aggregate(&snapshot.expenses, &snapshot.period);
    assert_eq!(summary.by_category[&Category::Food], 4500.0);
    let alerts = evaluator.evaluate(&summary.by_category, &snapshot.budgets);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Danger);
    assert_eq!(alerts[0].budget, 4000.0);
    assert_eq!(alerts[0].exceeded_by, 500.0);
}

#[test]
fn test_deleting_expense_clears_alert() {
    let db = Database::in_memory().unwrap();
    let today = date(2026, 10, 16);

    record(&db, "electricity", 900.0, Category::Bills, date(2026, 10, 1));
    db.set_budget(&Budget::new(Category::Bills, 1000.0).unwrap())
        .unwrap();

    let evaluator = BudgetAlertEvaluator::default();
    let alerts_for = |db: &Database| {
        let snapshot = db.snapshot(&Period::month_containing(today)).unwrap();
        let summary = aggregate(&snapshot.expenses, &snapshot.period);
        evaluator.evaluate(&summary.by_category, &snapshot.budgets)
    };

    assert_eq!(alerts_for(&db).len(), 1);

    let id = db.list_expenses(1).unwrap()[0].id;
    db.delete_expense(id).unwrap();
    assert!(alerts_for(&db).is_empty());
}

#[test]
fn test_empty_ledger_and_budgets_are_valid() {
    let db = Database::in_memory().unwrap();
    let snapshot = db.snapshot(&Period::all_time()).unwrap();
    let summary = aggregate(&snapshot.expenses, &snapshot.period);

    assert_eq!(summary.total_spent, 0.0);
    assert_eq!(summary.expense_count, 0);
    assert_eq!(summary.top_category, None);
    assert!(BudgetAlertEvaluator::default()
        .evaluate(&summary.by_category, &snapshot.budgets)
        .is_empty());
}

// =============================================================================
// Train → Save → Load → Predict
// =============================================================================

#[test]
fn test_trained_bundle_round_trips_through_disk() {
    let bundle = train_and_evaluate(&builtin_corpus(), &TrainingOptions::default()).unwrap();
    let before = PredictionService::new(bundle.clone(), 3)
        .predict("Uber ride to airport")
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    bundle.save(&path).unwrap();

    let loaded = ModelBundle::load(&path).unwrap();
    assert!(loaded.evaluation.is_some());

    let service = PredictionService::new(loaded, 3);
    let after = service.predict("Uber ride to airport").unwrap();

    assert_eq!(after.category, Category::Transport);
    assert!(after.top_confidence > 1.0 / 6.0);
    assert_eq!(after.category, before.category);
    assert!((after.top_confidence - before.top_confidence).abs() < 1e-9);
}

#[test]
fn test_short_descriptions_are_insufficient() {
    let service = PredictionService::new(ModelBundle::fit(&builtin_corpus(), 1.0).unwrap(), 3);
    assert!(matches!(
        service.predict(""),
        Err(Error::InsufficientInput { .. })
    ));
    assert!(matches!(
        service.predict("ab"),
        Err(Error::InsufficientInput { .. })
    ));
}

#[test]
fn test_corrupt_bundle_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, r#"{"format_version": 1}"#).unwrap();

    assert!(matches!(
        ModelBundle::load(&path),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_predictions_are_deterministic_across_services() {
    let bundle = ModelBundle::fit(&builtin_corpus(), 1.0).unwrap();
    let a = PredictionService::new(bundle.clone(), 3);
    let b = PredictionService::new(bundle, 3);

    for description in ["netflix subscription", "paid rent", "new shoes", "doctor visit"] {
        assert_eq!(
            a.predict(description).unwrap(),
            b.predict(description).unwrap()
        );
    }
}
