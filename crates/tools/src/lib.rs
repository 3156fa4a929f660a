//! Model-callable tools for foldcraft.
//!
//! The declared set is fixed at startup: `download_pdb` fetches native
//! structures from the RCSB database, `run_rfdiffusion` launches the
//! backbone-generation script. Each tool parses its input into a typed
//! argument struct before doing anything else; the remaining pipeline
//! stages are CLI-facing and stay out of the model's reach.

pub mod download_pdb;
pub mod rfdiffusion;

use std::sync::Arc;

use foldcraft_core::tool::ToolRegistry;
use foldcraft_pipeline::{ProcessRunner, WorkflowDirs};

pub use download_pdb::DownloadPdbTool;
pub use rfdiffusion::RunRfdiffusionTool;

/// Build the registry with both built-in tools.
///
/// `rfdiffusion_program` is the path to the RFdiffusion inference script.
pub fn default_registry(
    runner: Arc<dyn ProcessRunner>,
    dirs: WorkflowDirs,
    rfdiffusion_program: &str,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(DownloadPdbTool::new(dirs)));
    registry.register(Box::new(RunRfdiffusionTool::new(
        runner,
        rfdiffusion_program,
    )));
    registry
}
