//! TM-align scoring and score-based file management.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::process::ProcessRunner;

static TM_SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TM-score=\s*([\d.]+)").unwrap());
static RMSD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"RMSD=\s*([\d.]+)").unwrap());
static SCORED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z0-9]+)_.*score=([\d.]+)").unwrap());

/// Structural similarity extracted from TM-align output.
///
/// TM-align prints two TM-scores, one normalized by each chain's length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentScores {
    /// Normalized by the reference structure length (the backbone in the
    /// pipeline's self-consistency check, the native in `compare`).
    pub tm_score_ref: f64,
    /// Normalized by the generated structure length.
    pub tm_score_gen: f64,
    pub rmsd: f64,
}

/// Parse TM-scores and RMSD from raw TM-align stdout.
pub fn parse_scores(stdout: &str) -> Result<AlignmentScores, PipelineError> {
    let tm_scores: Vec<f64> = TM_SCORE_RE
        .captures_iter(stdout)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    if tm_scores.len() < 2 {
        return Err(PipelineError::TmScoresNotFound);
    }

    let rmsd = RMSD_RE
        .captures(stdout)
        .and_then(|c| c[1].parse().ok())
        .ok_or(PipelineError::RmsdNotFound)?;

    Ok(AlignmentScores {
        tm_score_ref: tm_scores[0],
        tm_score_gen: tm_scores[1],
        rmsd,
    })
}

/// Align two structures with TM-align and parse out the scores.
pub async fn extract_scores(
    runner: &dyn ProcessRunner,
    tmalign: &str,
    reference: &Path,
    generated: &Path,
) -> Result<AlignmentScores, PipelineError> {
    let stdout = alignment_report(runner, tmalign, reference, generated).await?;
    parse_scores(&stdout)
}

/// Align two structures with TM-align and return the full textual report.
pub async fn alignment_report(
    runner: &dyn ProcessRunner,
    tmalign: &str,
    reference: &Path,
    generated: &Path,
) -> Result<String, PipelineError> {
    let reference = std::path::absolute(reference)?;
    let generated = std::path::absolute(generated)?;
    info!(reference = %reference.display(), generated = %generated.display(), "Running TM-align");

    let args = vec![
        reference.to_string_lossy().into_owned(),
        generated.to_string_lossy().into_owned(),
    ];
    let output = runner.run(tmalign, &args).await?;
    if !output.success() {
        return Err(PipelineError::ProcessFailed {
            program: "TM-align".to_string(),
            code: output.status.unwrap_or(-1),
            stderr: output.stderr,
        });
    }
    Ok(output.stdout)
}

/// Rename OmegaFold outputs whose names embed a confidence score, e.g.
/// `5an7_scaffold_0, score=88.21.pdb` becomes `5an7_score_88.21.pdb`.
/// Returns the (old, new) file name pairs that were renamed.
pub fn rename_by_score(directory: &Path) -> Result<Vec<(String, String)>, PipelineError> {
    let mut renamed = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.ends_with(".pdb") {
            continue;
        }
        let Some(captures) = SCORED_NAME_RE.captures(&file_name) else {
            continue;
        };
        let new_name = format!("{}_score_{}.pdb", &captures[1], &captures[2]);
        if new_name == file_name {
            continue;
        }
        std::fs::rename(entry.path(), directory.join(&new_name))?;
        debug!(from = %file_name, to = %new_name, "Renamed scored structure");
        renamed.push((file_name, new_name));
    }
    Ok(renamed)
}

/// Find the renamed score file for a PDB code in a directory.
pub fn find_score_file(directory: &Path, pdb_code: &str) -> Option<PathBuf> {
    let prefix = format!("{pdb_code}_score");
    std::fs::read_dir(directory)
        .ok()?
        .flatten()
        .find(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(&prefix)
        })
        .map(|entry| entry.path())
}
