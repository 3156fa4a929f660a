//! The `download_pdb` tool: fetch a native structure from RCSB.

use async_trait::async_trait;
use serde::Deserialize;

use foldcraft_core::error::ToolError;
use foldcraft_core::tool::Tool;
use foldcraft_pipeline::{PipelineError, RCSB_DOWNLOAD_URL, WorkflowDirs, download_pdb};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DownloadPdbArgs {
    pdb_code: String,
    #[serde(default)]
    target_directory: Option<String>,
}

pub struct DownloadPdbTool {
    client: reqwest::Client,
    base_url: String,
    dirs: WorkflowDirs,
}

impl DownloadPdbTool {
    pub fn new(dirs: WorkflowDirs) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: RCSB_DOWNLOAD_URL.to_string(),
            dirs,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Tool for DownloadPdbTool {
    fn name(&self) -> &str {
        "download_pdb"
    }

    fn description(&self) -> &str {
        "Download, from the RCSB PDB database, the PDB file of the protein \
         identified by its PDB code. Examples of PDB codes are '5AN7' and '6KUS'."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pdb_code": {
                    "type": "string",
                    "description": "The PDB code of the protein to download."
                },
                "target_directory": {
                    "type": "string",
                    "description": "The directory where the PDB file will be saved.",
                    "default": "./work_flow/native_proteins"
                }
            },
            "required": ["pdb_code"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let args: DownloadPdbArgs =
            serde_json::from_value(input).map_err(|e| ToolError::MissingArgument {
                tool_name: "download_pdb".to_string(),
                reason: e.to_string(),
            })?;

        let target = match args.target_directory.filter(|d| !d.is_empty()) {
            Some(dir) => std::path::PathBuf::from(dir),
            None => self.dirs.native_proteins(),
        };

        download_pdb(&self.client, &self.base_url, &args.pdb_code, &target)
            .await
            .map_err(|e| match e {
                PipelineError::DownloadFailed { .. } => ToolError::InvalidInput {
                    tool_name: "download_pdb".to_string(),
                    reason: e.to_string(),
                },
                other => ToolError::ExecutionFailed {
                    tool_name: "download_pdb".to_string(),
                    reason: other.to_string(),
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn downloads_into_the_default_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/5AN7.pdb"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ATOM"))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let tool = DownloadPdbTool::new(WorkflowDirs::new(tmp.path().join("work_flow")))
            .with_base_url(server.uri());

        let message = tool
            .execute(serde_json::json!({ "pdb_code": "5an7" }))
            .await
            .unwrap();
        assert!(message.starts_with("PDB file 5AN7 downloaded successfully"));
        assert!(tmp
            .path()
            .join("work_flow")
            .join("native_proteins")
            .join("5AN7.pdb")
            .is_file());
    }

    #[tokio::test]
    async fn missing_code_fails_before_any_request() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = DownloadPdbTool::new(WorkflowDirs::new(tmp.path().join("work_flow")))
            .with_base_url("http://127.0.0.1:1");

        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { .. }));
    }

    #[tokio::test]
    async fn bad_code_is_an_input_error_with_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let tool = DownloadPdbTool::new(WorkflowDirs::new(tmp.path().join("work_flow")))
            .with_base_url(server.uri());

        let err = tool
            .execute(serde_json::json!({ "pdb_code": "zzzz" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Status code: 404"));
    }
}
