//! Offline training and evaluation
//!
//! Splits the corpus into a stratified holdout, fits a model on the
//! training share and scores it on the holdout, then refits on the whole
//! corpus for the bundle that actually ships. The split is deterministic so
//! repeated runs on the same corpus report the same numbers.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::TrainingOptions;
use crate::corpus::TrainingExample;
use crate::error::{Error, Result};
use crate::model::ModelBundle;
use crate::models::Category;

/// Descriptions whose category should be obvious to any usable model
pub const SANITY_CHECKS: &[(&str, Category)] = &[
    ("ride with uber", Category::Transport),
    ("electric bill payment", Category::Bills),
    ("bought jeans online", Category::Shopping),
    ("movie night pvr", Category::Entertainment),
    ("hospital checkup", Category::Other),
    ("zomato biryani order", Category::Food),
    ("petrol filling station", Category::Transport),
    ("amazon delivery", Category::Shopping),
    ("school fee", Category::Bills),
    ("pub night out", Category::Entertainment),
];

/// Holdout metrics for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetrics {
    pub category: Category,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Holdout examples labeled with this category
    pub support: usize,
}

/// Outcome of one sanity-check description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanityCheck {
    pub description: String,
    pub expected: Category,
    pub predicted: Category,
    pub passed: bool,
}

/// Training run report, stored alongside the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub train_size: usize,
    pub test_size: usize,
    /// Holdout accuracy; `None` when nothing was held out
    pub accuracy: Option<f64>,
    pub per_category: Vec<CategoryMetrics>,
    pub sanity_checks: Vec<SanityCheck>,
}

impl EvaluationReport {
    pub fn sanity_passed(&self) -> usize {
        self.sanity_checks.iter().filter(|c| c.passed).count()
    }
}

/// Deterministic stratified split into (train, test)
///
/// Each category contributes `round(m * test_fraction)` evenly spaced
/// examples to the test share, always leaving at least one for training.
pub fn stratified_split(
    corpus: &[TrainingExample],
    test_fraction: f64,
) -> (Vec<TrainingExample>, Vec<TrainingExample>) {
    let mut train = Vec::new();
    let mut test = Vec::new();

    for category in Category::ALL {
        let members: Vec<&TrainingExample> =
            corpus.iter().filter(|e| e.category == category).collect();
        let m = members.len();
        if m == 0 {
            continue;
        }

        let wanted = (m as f64 * test_fraction).round() as usize;
        let t = wanted.min(m - 1);
        let held_out: Vec<usize> = (0..t).map(|j| (j + 1) * m / (t + 1)).collect();

        for (i, example) in members.into_iter().enumerate() {
            if held_out.contains(&i) {
                test.push(example.clone());
            } else {
                train.push(example.clone());
            }
        }
    }

    (train, test)
}

/// Classify every example with a bundle, returning predicted categories
fn predict_all(bundle: &ModelBundle, examples: &[TrainingExample]) -> Result<Vec<Category>> {
    let (extractor, classifier, _) = bundle.clone().into_components();
    examples
        .iter()
        .map(|e| {
            let features = extractor.extract(&e.description)?;
            Ok(classifier.classify(&features)?.top().0)
        })
        .collect()
}

/// Per-category precision / recall / F1 over a labeled holdout
pub fn category_metrics(expected: &[Category], predicted: &[Category]) -> Vec<CategoryMetrics> {
    Category::ALL
        .iter()
        .map(|&category| {
            let pairs = expected.iter().zip(predicted);
            let tp = pairs
                .clone()
                .filter(|(e, p)| **e == category && **p == category)
                .count();
            let predicted_as = predicted.iter().filter(|p| **p == category).count();
            let support = expected.iter().filter(|e| **e == category).count();

            let precision = ratio(tp, predicted_as);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            CategoryMetrics {
                category,
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect()
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Train, evaluate on a stratified holdout, and refit on the full corpus
pub fn train_and_evaluate(
    corpus: &[TrainingExample],
    options: &TrainingOptions,
) -> Result<ModelBundle> {
    if corpus.is_empty() {
        return Err(Error::Validation(
            "Training corpus contains no examples".to_string(),
        ));
    }

    info!(examples = corpus.len(), "Training category model");
    for category in Category::ALL {
        let count = corpus.iter().filter(|e| e.category == category).count();
        if count == 0 {
            warn!(category = %category, "No training examples for category");
        }
    }

    let (train, test) = stratified_split(corpus, options.test_fraction);

    let (accuracy, per_category) = if test.is_empty() {
        (None, Vec::new())
    } else {
        let holdout_model = ModelBundle::fit(&train, options.alpha)?;
        let predicted = predict_all(&holdout_model, &test)?;
        let expected: Vec<Category> = test.iter().map(|e| e.category).collect();
        let correct = expected
            .iter()
            .zip(&predicted)
            .filter(|(e, p)| e == p)
            .count();
        let accuracy = correct as f64 / test.len() as f64;
        info!(
            train = train.len(),
            test = test.len(),
            accuracy = format!("{:.3}", accuracy),
            "Holdout evaluation complete"
        );
        (Some(accuracy), category_metrics(&expected, &predicted))
    };

    let mut bundle = ModelBundle::fit(corpus, options.alpha)?;

    let checks: Vec<TrainingExample> = SANITY_CHECKS
        .iter()
        .map(|(d, c)| TrainingExample::new(*d, *c))
        .collect();
    let sanity_checks: Vec<SanityCheck> = predict_all(&bundle, &checks)?
        .into_iter()
        .zip(checks)
        .map(|(predicted, check)| SanityCheck {
            passed: predicted == check.category,
            description: check.description,
            expected: check.category,
            predicted,
        })
        .collect();

    for check in sanity_checks.iter().filter(|c| !c.passed) {
        warn!(
            description = %check.description,
            expected = %check.expected,
            predicted = %check.predicted,
            "Sanity check failed"
        );
    }

    bundle.evaluation = Some(EvaluationReport {
        train_size: train.len(),
        test_size: test.len(),
        accuracy,
        per_category,
        sanity_checks,
    });

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::builtin_corpus;

    #[test]
    fn test_split_is_stratified_and_deterministic() {
        let corpus = builtin_corpus();
        let (train, test) = stratified_split(&corpus, 0.15);
        assert_eq!(train.len() + test.len(), corpus.len());

        for category in Category::ALL {
            let held = test.iter().filter(|e| e.category == category).count();
            // round(50 * 0.15) = 8 (7.5 rounds away from zero)
            assert!((7..=8).contains(&held), "{} held out {}", category, held);
        }

        let (train2, test2) = stratified_split(&corpus, 0.15);
        assert_eq!(train, train2);
        assert_eq!(test, test2);
    }

    #[test]
    fn test_split_keeps_one_for_training() {
        let corpus = vec![TrainingExample::new("uber", Category::Transport)];
        let (train, test) = stratified_split(&corpus, 0.5);
        assert_eq!(train.len(), 1);
        assert!(test.is_empty());
    }

    #[test]
    fn test_zero_fraction_holds_nothing_out() {
        let corpus = builtin_corpus();
        let (train, test) = stratified_split(&corpus, 0.0);
        assert_eq!(train.len(), corpus.len());
        assert!(test.is_empty());
    }

    #[test]
    fn test_category_metrics() {
        let expected = [Category::Food, Category::Food, Category::Bills];
        let predicted = [Category::Food, Category::Bills, Category::Bills];
        let metrics = category_metrics(&expected, &predicted);

        let food = &metrics[Category::Food.index()];
        assert_eq!(food.support, 2);
        assert_eq!(food.precision, 1.0);
        assert_eq!(food.recall, 0.5);

        let bills = &metrics[Category::Bills.index()];
        assert_eq!(bills.precision, 0.5);
        assert_eq!(bills.recall, 1.0);

        let other = &metrics[Category::Other.index()];
        assert_eq!(other.support, 0);
        assert_eq!(other.f1, 0.0);
    }

    #[test]
    fn test_train_and_evaluate_builtin_corpus() {
        let bundle = train_and_evaluate(&builtin_corpus(), &TrainingOptions::default()).unwrap();
        let report = bundle.evaluation.as_ref().unwrap();

        assert_eq!(bundle.training_examples, builtin_corpus().len());
        assert_eq!(report.train_size + report.test_size, builtin_corpus().len());
        assert_eq!(report.per_category.len(), Category::COUNT);
        assert_eq!(report.sanity_checks.len(), SANITY_CHECKS.len());

        let accuracy = report.accuracy.unwrap();
        assert!(accuracy > 0.5, "holdout accuracy {}", accuracy);

        let failed: Vec<&str> = report
            .sanity_checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.description.as_str())
            .collect();
        assert!(report.sanity_passed() >= 8, "failed sanity checks: {:?}", failed);
    }

    #[test]
    fn test_train_rejects_empty_corpus() {
        let result = train_and_evaluate(&[], &TrainingOptions::default());
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
