//! Pipeline error types.
//!
//! The display strings double as tool-result text fed back to the remote
//! model, so they stay human-readable and name the fix where one exists.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input file does not exist")]
    MissingInputFile,

    #[error("Please fill in residues for the backbone")]
    MissingResidues,

    #[error("Failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with code {code}: {stderr}")]
    ProcessFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error(
        "Failed to download PDB file {code}. Status code: {status}. \
         Please verify PDB code is correct and exists in RCSB database."
    )]
    DownloadFailed { code: String, status: u16 },

    #[error("Network error downloading PDB file {code}: {reason}")]
    DownloadNetwork { code: String, reason: String },

    #[error("TM-scores not found in the TM-align output")]
    TmScoresNotFound,

    #[error("RMSD score not found in the TM-align output")]
    RmsdNotFound,

    #[error("No scored structure found for {0}")]
    ScoreFileNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
