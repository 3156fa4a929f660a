//! Subprocess invocation seam.
//!
//! External programs are run with an explicit program + argument list and
//! return a structured exit status plus captured output. The trait lets
//! pipeline and tool tests substitute a recording fake for the real spawns.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::PipelineError;

/// Captured result of one subprocess run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs an external program with a typed argument list.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<ProcessOutput, PipelineError>;
}

/// The production runner: `tokio::process::Command`, output fully captured.
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<ProcessOutput, PipelineError> {
        debug!(program, ?args, "Running external program");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| PipelineError::Spawn {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_status() {
        let runner = TokioProcessRunner;
        let output = runner
            .run("echo", &["hello".to_string()])
            .await
            .unwrap();
        assert!(output.success());
        assert!(output.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let runner = TokioProcessRunner;
        let err = runner
            .run("definitely-not-a-real-program-xyz", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Spawn { .. }));
    }
}
