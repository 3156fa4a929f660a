//! External protein-design program invocation for foldcraft.
//!
//! Everything here wraps an opaque collaborator — the RCSB file server, the
//! RFdiffusion / ProteinMPNN / OmegaFold executables, and TM-align — behind
//! a narrow, typed interface. No science happens in this crate: it builds
//! folder layouts, argument lists, and parses text output.
//!
//! Subprocesses are always invoked with a typed argument list through the
//! [`ProcessRunner`] seam, never via an assembled shell string.

pub mod download;
pub mod error;
pub mod mpnn;
pub mod omegafold;
pub mod pipeline;
pub mod process;
pub mod rfdiffusion;
pub mod scores;
pub mod workspace;

pub use download::{RCSB_DOWNLOAD_URL, download_pdb};
pub use error::PipelineError;
pub use mpnn::{ProteinMpnnParams, run_protein_mpnn};
pub use omegafold::run_omegafold;
pub use pipeline::{DesignPipeline, PipelineReport, Programs};
pub use process::{ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use rfdiffusion::{RfdiffusionParams, run_rfdiffusion};
pub use scores::{AlignmentScores, alignment_report, extract_scores, find_score_file, rename_by_score};
pub use workspace::WorkflowDirs;
