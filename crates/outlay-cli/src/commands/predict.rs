//! Prediction command implementation

use anyhow::Result;
use outlay_core::PredictionService;

pub fn cmd_predict(predictor: &PredictionService, description: &str, json: bool) -> Result<()> {
    let prediction = predictor.predict(description)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    println!(
        "🏷️  {} ({:.0}% confidence)",
        prediction.category,
        prediction.top_confidence * 100.0
    );
    if prediction.known_terms == 0 {
        println!("   ⚠️  No known words in description; this is a guess");
    }

    let mut ranked: Vec<_> = prediction.confidence.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (category, p) in ranked {
        println!("   {:15} {:>5.1}%", category.as_str(), p * 100.0);
    }

    Ok(())
}
