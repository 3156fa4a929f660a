//! The `work_flow` directory layout.
//!
//! Every pipeline stage reads from and writes into one of four fixed
//! subfolders under the workspace root. Setup is idempotent: an existing
//! root is left exactly as it is.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

const SUBFOLDERS: [&str; 4] = [
    "RFdiffusion_output",
    "mpnn_output",
    "omegafold_output",
    "native_proteins",
];

/// The fixed workspace layout rooted at a `work_flow` directory.
#[derive(Debug, Clone)]
pub struct WorkflowDirs {
    root: PathBuf,
}

impl WorkflowDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rfdiffusion_output(&self) -> PathBuf {
        self.root.join("RFdiffusion_output")
    }

    pub fn mpnn_output(&self) -> PathBuf {
        self.root.join("mpnn_output")
    }

    pub fn omegafold_output(&self) -> PathBuf {
        self.root.join("omegafold_output")
    }

    pub fn native_proteins(&self) -> PathBuf {
        self.root.join("native_proteins")
    }

    /// Create the root and its subfolders.
    ///
    /// Returns `true` if the structure was created, `false` if the root
    /// already existed (in which case nothing is touched).
    pub fn setup(&self) -> Result<bool, PipelineError> {
        if self.root.exists() {
            return Ok(false);
        }

        std::fs::create_dir_all(&self.root)?;
        for subfolder in SUBFOLDERS {
            std::fs::create_dir_all(self.root.join(subfolder))?;
        }
        Ok(true)
    }
}
