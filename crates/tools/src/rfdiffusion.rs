//! The `run_rfdiffusion` tool: launch backbone generation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use foldcraft_core::error::ToolError;
use foldcraft_core::tool::Tool;
use foldcraft_pipeline::{PipelineError, ProcessRunner, RfdiffusionParams, run_rfdiffusion};

pub struct RunRfdiffusionTool {
    runner: Arc<dyn ProcessRunner>,
    program: String,
}

impl RunRfdiffusionTool {
    pub fn new(runner: Arc<dyn ProcessRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }
}

#[async_trait]
impl Tool for RunRfdiffusionTool {
    fn name(&self) -> &str {
        "run_rfdiffusion"
    }

    fn description(&self) -> &str {
        "Execute the RFdiffusion model to generate protein designs."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "input_file": {
                    "type": "string",
                    "description": "Path to the input PDB file."
                },
                "output_dir_and_prefix": {
                    "type": "string",
                    "description": "Output directory and prefix for the results.",
                    "default": "./work_flow/RFdiffusion_output"
                },
                "residues_backbone": {
                    "type": "string",
                    "description": "Residues that specify how to build the backbone, \
                        enclosed in square brackets. If there are multiple residues, \
                        they should be separated by /. Examples are: [A20-30] which has \
                        one residue, [20-30/157-163] which has 2 residues, \
                        [10-100/A1083-1085/20-40/A1040-1051/25-61/B1180-1080/10-10] \
                        which has 5 residues."
                },
                "number_proteins": {
                    "type": "integer",
                    "description": "Number of protein designs to generate.",
                    "default": 1
                },
                "guide_scale": {
                    "type": "integer",
                    "description": "Guide scale for the potentials."
                },
                "substrate_name": {
                    "type": "string",
                    "description": "Name of the substrate."
                },
                "model_weights": {
                    "type": "string",
                    "description": "Path to the model weights file."
                },
                "contig_length": {
                    "type": "string",
                    "description": "Contig length to be used."
                },
                "guiding_potentials": {
                    "type": "string",
                    "description": "Guiding potentials to be used."
                }
            },
            "required": ["output_dir_and_prefix"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let params: RfdiffusionParams =
            serde_json::from_value(input).map_err(|e| ToolError::MissingArgument {
                tool_name: "run_rfdiffusion".to_string(),
                reason: e.to_string(),
            })?;
        let params = params.normalized();

        run_rfdiffusion(self.runner.as_ref(), &self.program, &params)
            .await
            .map_err(|e| match e {
                PipelineError::MissingInputFile | PipelineError::MissingResidues => {
                    ToolError::InvalidInput {
                        tool_name: "run_rfdiffusion".to_string(),
                        reason: e.to_string(),
                    }
                }
                other => {
                    warn!(error = %other, "RFdiffusion run failed");
                    ToolError::ExecutionFailed {
                        tool_name: "run_rfdiffusion".to_string(),
                        reason: other.to_string(),
                    }
                }
            })?;

        Ok("RFdiffusion run completed successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldcraft_pipeline::{PipelineError, ProcessOutput};
    use std::sync::Mutex;

    struct FakeRunner {
        output: ProcessOutput,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeRunner {
        fn succeeding() -> Self {
            Self {
                output: ProcessOutput {
                    status: Some(0),
                    stdout: String::new(),
                    stderr: String::new(),
                },
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(code: i32, stderr: &str) -> Self {
            Self {
                output: ProcessOutput {
                    status: Some(code),
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                },
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeRunner {
        async fn run(
            &self,
            program: &str,
            args: &[String],
        ) -> Result<ProcessOutput, PipelineError> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(self.output.clone())
        }
    }

    #[tokio::test]
    async fn success_reports_completion() {
        let runner = Arc::new(FakeRunner::succeeding());
        let tool = RunRfdiffusionTool::new(runner.clone(), "run_inference.py");

        let message = tool
            .execute(serde_json::json!({
                "output_dir_and_prefix": "out/run1",
                "residues_backbone": "[A20-30]"
            }))
            .await
            .unwrap();
        assert_eq!(message, "RFdiffusion run completed successfully.");

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].0, "run_inference.py");
        assert!(calls[0].1.contains(&"contigmap.contigs=[A20-30]".to_string()));
    }

    #[tokio::test]
    async fn missing_input_file_is_an_input_error() {
        let runner = Arc::new(FakeRunner::succeeding());
        let tool = RunRfdiffusionTool::new(runner.clone(), "run_inference.py");

        let err = tool
            .execute(serde_json::json!({
                "input_file": "/nonexistent/structure.pdb",
                "output_dir_and_prefix": "out/run1"
            }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Input file does not exist");
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_required_field_fails_deserialization() {
        let tool = RunRfdiffusionTool::new(Arc::new(FakeRunner::succeeding()), "run_inference.py");
        let err = tool
            .execute(serde_json::json!({ "residues_backbone": "[A20-30]" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { .. }));
    }

    #[tokio::test]
    async fn process_failure_is_an_execution_error() {
        let runner = Arc::new(FakeRunner::failing(1, "CUDA out of memory"));
        let tool = RunRfdiffusionTool::new(runner, "run_inference.py");

        let err = tool
            .execute(serde_json::json!({ "output_dir_and_prefix": "out/run1" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("CUDA"));
    }
}
