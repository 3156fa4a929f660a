//! End-to-end design pipeline: download, diffuse, design, fold, score.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::download::download_pdb;
use crate::error::PipelineError;
use crate::mpnn::{run_protein_mpnn, ProteinMpnnParams};
use crate::omegafold::run_omegafold;
use crate::process::ProcessRunner;
use crate::rfdiffusion::{run_rfdiffusion, RfdiffusionParams};
use crate::scores::{extract_scores, find_score_file, rename_by_score, AlignmentScores};
use crate::workspace::WorkflowDirs;

/// Paths to the external programs the pipeline drives.
#[derive(Debug, Clone)]
pub struct Programs {
    pub rfdiffusion: String,
    pub protein_mpnn: String,
    pub omegafold: String,
    pub tmalign: String,
}

/// Result of a full design run for one PDB code.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub scores: AlignmentScores,
    pub elapsed: Duration,
    /// The folded, score-renamed structure that was aligned against the
    /// first-stage backbone.
    pub scored_structure: PathBuf,
}

/// Drives the four external tools through one design cycle.
pub struct DesignPipeline {
    runner: Arc<dyn ProcessRunner>,
    programs: Programs,
    dirs: WorkflowDirs,
    client: reqwest::Client,
    rcsb_base_url: String,
}

impl DesignPipeline {
    pub fn new(runner: Arc<dyn ProcessRunner>, programs: Programs, dirs: WorkflowDirs) -> Self {
        Self {
            runner,
            programs,
            dirs,
            client: reqwest::Client::new(),
            rcsb_base_url: crate::download::RCSB_DOWNLOAD_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_rcsb_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.rcsb_base_url = base_url.into();
        self
    }

    pub fn dirs(&self) -> &WorkflowDirs {
        &self.dirs
    }

    /// Run the whole cycle for one protein: fetch the native structure,
    /// generate a backbone conditioned on `residues`, design one sequence,
    /// fold it, and score the fold against the generated backbone.
    pub async fn process_protein(
        &self,
        pdb_code: &str,
        residues: &str,
    ) -> Result<PipelineReport, PipelineError> {
        let started = Instant::now();
        let code = pdb_code.to_lowercase();
        let code_upper = pdb_code.to_uppercase();

        self.dirs.setup()?;
        download_pdb(
            &self.client,
            &self.rcsb_base_url,
            &code,
            &self.dirs.native_proteins(),
        )
        .await?;
        let native = self.dirs.native_proteins().join(format!("{code_upper}.pdb"));

        let rf_output_dir = self.dirs.rfdiffusion_output().join(&code);
        let rf_prefix = rf_output_dir.join(format!("{code}_scaffold"));
        let rf_params = RfdiffusionParams {
            input_file: Some(native.to_string_lossy().into_owned()),
            output_dir_and_prefix: rf_prefix.to_string_lossy().into_owned(),
            residues_backbone: Some(residues.to_string()),
            number_proteins: 1,
            guide_scale: None,
            substrate_name: None,
            model_weights: None,
            contig_length: None,
            guiding_potentials: None,
        };
        run_rfdiffusion(self.runner.as_ref(), &self.programs.rfdiffusion, &rf_params).await?;

        let scaffold = rf_output_dir.join(format!("{code}_scaffold_0.pdb"));
        let mpnn_output_dir = self.dirs.mpnn_output().join(&code);
        let mut mpnn_params = ProteinMpnnParams::new(
            scaffold.to_string_lossy(),
            mpnn_output_dir.to_string_lossy(),
        );
        mpnn_params.num_seq_per_target = 1;
        run_protein_mpnn(self.runner.as_ref(), &self.programs.protein_mpnn, &mpnn_params).await?;

        let fasta = mpnn_output_dir
            .join("seqs")
            .join(format!("{code}_scaffold_0.fa"));
        let fold_output_dir = self.dirs.omegafold_output().join(&code);
        run_omegafold(
            self.runner.as_ref(),
            &self.programs.omegafold,
            &fasta.to_string_lossy(),
            &fold_output_dir.to_string_lossy(),
        )
        .await?;

        rename_by_score(&fold_output_dir)?;
        let scored_structure = find_score_file(&fold_output_dir, &code)
            .ok_or_else(|| PipelineError::ScoreFileNotFound(code.clone()))?;

        // Self-consistency metric: first-stage backbone vs. the folded
        // design. Comparing against the native is `compare`'s job.
        let scores = extract_scores(
            self.runner.as_ref(),
            &self.programs.tmalign,
            &scaffold,
            &scored_structure,
        )
        .await?;

        let elapsed = started.elapsed();
        info!(
            code,
            tm_score_ref = scores.tm_score_ref,
            rmsd = scores.rmsd,
            seconds = elapsed.as_secs(),
            "Design cycle complete"
        );
        Ok(PipelineReport {
            scores,
            elapsed,
            scored_structure,
        })
    }
}
