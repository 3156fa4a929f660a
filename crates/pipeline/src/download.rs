//! Structure download from the RCSB Protein Data Bank.

use std::path::Path;

use tracing::info;

use crate::error::PipelineError;

/// Public download endpoint for PDB-format structure files.
pub const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";

/// Download the structure file for a PDB code into `target_directory`.
///
/// The code is uppercased; the target directory is created if missing. On
/// success returns the message fed back to the model, beginning
/// `PDB file {CODE} downloaded successfully`. A non-200 response becomes a
/// descriptive [`PipelineError::DownloadFailed`].
pub async fn download_pdb(
    client: &reqwest::Client,
    base_url: &str,
    pdb_code: &str,
    target_directory: &Path,
) -> Result<String, PipelineError> {
    let code = pdb_code.to_uppercase();

    tokio::fs::create_dir_all(target_directory).await?;
    let pdb_file_path = target_directory.join(format!("{code}.pdb"));

    let url = format!("{}/{code}.pdb", base_url.trim_end_matches('/'));
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| PipelineError::DownloadNetwork {
            code: code.clone(),
            reason: e.to_string(),
        })?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(PipelineError::DownloadFailed { code, status });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PipelineError::DownloadNetwork {
            code: code.clone(),
            reason: e.to_string(),
        })?;
    tokio::fs::write(&pdb_file_path, &bytes).await?;

    info!(code, path = %pdb_file_path.display(), "Downloaded PDB structure");
    Ok(format!(
        "PDB file {code} downloaded successfully to {}",
        pdb_file_path.display()
    ))
}
