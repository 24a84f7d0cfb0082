//! Model training command implementations

use std::path::Path;

use anyhow::{Context, Result};
use outlay_core::corpus::{builtin_corpus, load_corpus_csv};
use outlay_core::training::train_and_evaluate;
use outlay_core::{ModelBundle, TrainingOptions};

pub fn cmd_train(model_path: &Path, corpus: Option<&Path>, options: &TrainingOptions) -> Result<()> {
    let examples = match corpus {
        Some(path) => load_corpus_csv(path)
            .with_context(|| format!("Failed to load corpus {}", path.display()))?,
        None => builtin_corpus(),
    };

    println!("🧠 Training category model");
    println!(
        "   Corpus: {} ({} examples)",
        corpus.map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        examples.len()
    );
    println!("   Alpha: {}  Holdout: {:.0}%", options.alpha, options.test_fraction * 100.0);

    let bundle = train_and_evaluate(&examples, options).context("Training failed")?;
    print_report(&bundle);

    bundle
        .save(model_path)
        .with_context(|| format!("Failed to write model to {}", model_path.display()))?;

    println!();
    println!("💾 Model saved → {}", model_path.display());
    Ok(())
}

fn print_report(bundle: &ModelBundle) {
    let Some(report) = &bundle.evaluation else {
        return;
    };

    println!();
    match report.accuracy {
        Some(accuracy) => println!(
            "✅ Holdout accuracy: {:.1}% ({} train / {} test)",
            accuracy * 100.0,
            report.train_size,
            report.test_size
        ),
        None => println!("   No holdout (test fraction 0)"),
    }

    if !report.per_category.is_empty() {
        println!();
        println!(
            "   {:15} │ {:>9} │ {:>6} │ {:>5} │ {:>7}",
            "Category", "Precision", "Recall", "F1", "Support"
        );
        println!("   ────────────────┼───────────┼────────┼───────┼────────");
        for m in &report.per_category {
            println!(
                "   {:15} │ {:>9.2} │ {:>6.2} │ {:>5.2} │ {:>7}",
                m.category.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            );
        }
    }

    println!();
    println!("🧪 Sanity checks:");
    for check in &report.sanity_checks {
        let mark = if check.passed { "✅" } else { "❌" };
        println!(
            "   {}  '{}' → {}  (expected: {})",
            mark, check.description, check.predicted, check.expected
        );
    }
    if report.sanity_passed() == report.sanity_checks.len() {
        println!("   All sanity checks passed!");
    }
}

pub fn cmd_model_info(model_path: &Path) -> Result<()> {
    let bundle = ModelBundle::load(model_path)
        .with_context(|| format!("Failed to load model {}", model_path.display()))?;
    let info = bundle.info();

    println!("🧠 Model bundle: {}", model_path.display());
    println!("   Format version: {}", info.format_version);
    println!("   Trained: {}", info.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("   Examples: {}", info.training_examples);
    println!("   Vocabulary: {} terms", info.vocabulary_size);
    println!("   Smoothing: {}", bundle.alpha);
    match info.accuracy {
        Some(accuracy) => println!("   Holdout accuracy: {:.1}%", accuracy * 100.0),
        None => println!("   Holdout accuracy: not evaluated"),
    }

    Ok(())
}
