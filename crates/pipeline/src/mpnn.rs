//! ProteinMPNN sequence design over a generated backbone.

use tracing::info;

use crate::error::PipelineError;
use crate::process::{ProcessOutput, ProcessRunner};

/// Arguments for one ProteinMPNN run. Defaults mirror the upstream script.
#[derive(Debug, Clone)]
pub struct ProteinMpnnParams {
    pub input_file: String,
    pub output_dir: String,
    pub num_seq_per_target: u32,
    pub sampling_temp: String,
    pub seed: u32,
    pub batch_size: u32,
    pub model_name: String,
}

impl ProteinMpnnParams {
    pub fn new(input_file: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            input_file: input_file.into(),
            output_dir: output_dir.into(),
            num_seq_per_target: 10,
            sampling_temp: "0.1".to_string(),
            seed: 0,
            batch_size: 1,
            model_name: "v_48_020".to_string(),
        }
    }

    fn to_args(&self, script: &str) -> Vec<String> {
        vec![
            script.to_string(),
            "--pdb_path".to_string(),
            self.input_file.clone(),
            "--out_folder".to_string(),
            self.output_dir.clone(),
            "--num_seq_per_target".to_string(),
            self.num_seq_per_target.to_string(),
            "--sampling_temp".to_string(),
            self.sampling_temp.clone(),
            "--seed".to_string(),
            self.seed.to_string(),
            "--batch_size".to_string(),
            self.batch_size.to_string(),
            "--model_name".to_string(),
            self.model_name.clone(),
        ]
    }
}

/// Design sequences for a backbone with ProteinMPNN. `script` is the path to
/// `protein_mpnn_run.py`, executed through the python interpreter.
pub async fn run_protein_mpnn(
    runner: &dyn ProcessRunner,
    script: &str,
    params: &ProteinMpnnParams,
) -> Result<ProcessOutput, PipelineError> {
    if !std::path::Path::new(&params.input_file).exists() {
        return Err(PipelineError::MissingInputFile);
    }
    info!(input = %params.input_file, sequences = params.num_seq_per_target, "Running ProteinMPNN");

    let output = runner.run("python", &params.to_args(script)).await?;
    if !output.success() {
        return Err(PipelineError::ProcessFailed {
            program: "ProteinMPNN".to_string(),
            code: output.status.unwrap_or(-1),
            stderr: output.stderr,
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::test_support::ScriptedRunner;

    #[tokio::test]
    async fn passes_defaults_through_to_the_script() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("scaffold_0.pdb");
        std::fs::write(&input, "ATOM").unwrap();

        let runner = ScriptedRunner::succeeding("");
        let params = ProteinMpnnParams::new(input.to_string_lossy(), "out/mpnn");
        run_protein_mpnn(&runner, "./ProteinMPNN/protein_mpnn_run.py", &params)
            .await
            .unwrap();

        let calls = runner.recorded_calls();
        assert_eq!(calls.len(), 1);
        let (program, args) = &calls[0];
        assert_eq!(program, "python");
        assert_eq!(args[0], "./ProteinMPNN/protein_mpnn_run.py");
        assert!(args.windows(2).any(|w| w == ["--num_seq_per_target", "10"]));
        assert!(args.windows(2).any(|w| w == ["--sampling_temp", "0.1"]));
        assert!(args.windows(2).any(|w| w == ["--model_name", "v_48_020"]));
    }

    #[tokio::test]
    async fn missing_backbone_fails_before_spawning() {
        let runner = ScriptedRunner::succeeding("");
        let params = ProteinMpnnParams::new("/nonexistent/scaffold.pdb", "out/mpnn");
        let err = run_protein_mpnn(&runner, "script.py", &params)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Input file does not exist");
        assert!(runner.recorded_calls().is_empty());
    }
}
