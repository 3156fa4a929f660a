//! Structure prediction with OmegaFold.

use tracing::info;

use crate::error::PipelineError;
use crate::process::{ProcessOutput, ProcessRunner};

/// Fold the sequences in `input_file` (FASTA) into `output_dir`.
pub async fn run_omegafold(
    runner: &dyn ProcessRunner,
    program: &str,
    input_file: &str,
    output_dir: &str,
) -> Result<ProcessOutput, PipelineError> {
    if !std::path::Path::new(input_file).exists() {
        return Err(PipelineError::MissingInputFile);
    }
    info!(input = %input_file, "Running OmegaFold");

    let args = vec![input_file.to_string(), output_dir.to_string()];
    let output = runner.run(program, &args).await?;
    if !output.success() {
        return Err(PipelineError::ProcessFailed {
            program: "OmegaFold".to_string(),
            code: output.status.unwrap_or(-1),
            stderr: output.stderr,
        });
    }
    Ok(output)
}
