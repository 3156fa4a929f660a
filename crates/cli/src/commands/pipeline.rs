//! `foldcraft pipeline` — one full design cycle from the command line.

use std::sync::Arc;

use foldcraft_config::AppConfig;
use foldcraft_pipeline::{DesignPipeline, Programs, TokioProcessRunner, WorkflowDirs};

pub async fn run(pdb_code: &str, residues: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let programs = Programs {
        rfdiffusion: config.programs.rfdiffusion.clone(),
        protein_mpnn: config.programs.protein_mpnn.clone(),
        omegafold: config.programs.omegafold.clone(),
        tmalign: config.programs.tmalign.clone(),
    };
    let pipeline = DesignPipeline::new(
        Arc::new(TokioProcessRunner),
        programs,
        WorkflowDirs::new(&config.workspace.root),
    );

    let report = pipeline.process_protein(pdb_code, residues).await?;

    println!("Design cycle for {pdb_code} finished in {:.1?}", report.elapsed);
    println!("Scored structure: {}", report.scored_structure.display());
    println!(
        "TM-score (vs native length): {:.5}",
        report.scores.tm_score_ref
    );
    println!(
        "TM-score (vs design length): {:.5}",
        report.scores.tm_score_gen
    );
    println!("RMSD: {:.2}", report.scores.rmsd);

    Ok(())
}
