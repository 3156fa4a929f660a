//! RFdiffusion backbone generation.

use serde::Deserialize;
use tracing::info;

use crate::error::PipelineError;
use crate::process::{ProcessOutput, ProcessRunner};

/// Arguments accepted by the RFdiffusion inference script.
///
/// Deserialized from model-produced tool input. Unknown fields are rejected
/// at the dispatch boundary so a hallucinated argument fails loudly instead
/// of being silently dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RfdiffusionParams {
    /// Starting structure to diffuse from. Optional; absent for
    /// unconditional generation.
    #[serde(default)]
    pub input_file: Option<String>,
    /// Output path prefix, e.g. `work_flow/RFdiffusion_output/5an7/5an7_scaffold`.
    pub output_dir_and_prefix: String,
    /// Contig string describing which residues to keep and redesign.
    #[serde(default)]
    pub residues_backbone: Option<String>,
    #[serde(default = "default_number_proteins")]
    pub number_proteins: u32,
    #[serde(default)]
    pub guide_scale: Option<i64>,
    #[serde(default)]
    pub substrate_name: Option<String>,
    #[serde(default)]
    pub model_weights: Option<String>,
    #[serde(default)]
    pub contig_length: Option<String>,
    #[serde(default)]
    pub guiding_potentials: Option<String>,
}

fn default_number_proteins() -> u32 {
    1
}

impl RfdiffusionParams {
    /// Collapse empty-string optionals to `None`. The model sometimes sends
    /// `""` for arguments it has no value for.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.input_file,
            &mut self.residues_backbone,
            &mut self.substrate_name,
            &mut self.model_weights,
            &mut self.contig_length,
            &mut self.guiding_potentials,
        ] {
            if field.as_deref().is_some_and(|s| s.is_empty()) {
                *field = None;
            }
        }
        self
    }

    /// Check invariants before any subprocess is spawned.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if let Some(input) = &self.input_file {
            if !std::path::Path::new(input).exists() {
                return Err(PipelineError::MissingInputFile);
            }
        }
        if self.residues_backbone.is_none() && self.guide_scale.is_some() {
            return Err(PipelineError::MissingResidues);
        }
        Ok(())
    }

    /// Build the hydra override list passed to the inference script.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("inference.output_prefix={}", self.output_dir_and_prefix),
            format!("inference.num_designs={}", self.number_proteins),
        ];
        if let Some(input) = &self.input_file {
            args.push(format!("inference.input_pdb={input}"));
        }
        if let Some(residues) = &self.residues_backbone {
            args.push(format!("contigmap.contigs={residues}"));
        }
        if let Some(length) = &self.contig_length {
            args.push(format!("contigmap.length={length}"));
        }
        if let Some(scale) = self.guide_scale {
            args.push(format!("potentials.guide_scale={scale}"));
        }
        if let Some(potentials) = &self.guiding_potentials {
            args.push(format!("potentials.guiding_potentials=[\"{potentials}\"]"));
        }
        if let Some(substrate) = &self.substrate_name {
            args.push(format!("potentials.substrate={substrate}"));
        }
        if let Some(weights) = &self.model_weights {
            args.push(format!("inference.ckpt_override_path={weights}"));
        }
        args
    }
}

/// Run the RFdiffusion inference script with validated parameters.
pub async fn run_rfdiffusion(
    runner: &dyn ProcessRunner,
    program: &str,
    params: &RfdiffusionParams,
) -> Result<ProcessOutput, PipelineError> {
    params.validate()?;
    let args = params.to_args();
    info!(program, designs = params.number_proteins, "Running RFdiffusion");

    let output = runner.run(program, &args).await?;
    if !output.success() {
        return Err(PipelineError::ProcessFailed {
            program: "RFdiffusion".to_string(),
            code: output.status.unwrap_or(-1),
            stderr: output.stderr,
        });
    }
    Ok(output)
}
