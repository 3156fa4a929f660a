//! `foldcraft compare` — TM-align two structures and print the report.

use std::path::Path;

use foldcraft_config::AppConfig;
use foldcraft_pipeline::{TokioProcessRunner, alignment_report};

pub async fn run(reference: &str, generated: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let report = alignment_report(
        &TokioProcessRunner,
        &config.programs.tmalign,
        Path::new(reference),
        Path::new(generated),
    )
    .await?;

    println!("{report}");
    Ok(())
}
