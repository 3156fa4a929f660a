//! Configuration loading and validation for foldcraft.
//!
//! Loads configuration from `~/.foldcraft/config.toml` with environment
//! variable overrides. Missing files fall back to defaults; invalid values
//! are rejected at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.foldcraft/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Anthropic API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier sent on every chat request
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Design workspace layout
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Paths to the wrapped external programs
    #[serde(default)]
    pub programs: ProgramsConfig,
}

fn default_model() -> String {
    "claude-3-haiku-20240307".into()
}
fn default_max_tokens() -> u32 {
    4096
}

/// Redact the API key in Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("workspace", &self.workspace)
            .field("programs", &self.programs)
            .finish()
    }
}

/// Where the design workspace lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Root of the `work_flow` directory tree
    #[serde(default = "default_workspace_root")]
    pub root: String,
}

fn default_workspace_root() -> String {
    "./work_flow".into()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
        }
    }
}

/// Paths to the external protein-design programs.
///
/// Each is invoked as-is with a typed argument list; none of these paths is
/// validated at load time since the programs may live on another host image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    /// RFdiffusion inference entry point
    #[serde(default = "default_rfdiffusion")]
    pub rfdiffusion: String,

    /// ProteinMPNN run script (invoked through `python`)
    #[serde(default = "default_protein_mpnn")]
    pub protein_mpnn: String,

    /// OmegaFold executable
    #[serde(default = "default_omegafold")]
    pub omegafold: String,

    /// TM-align executable
    #[serde(default = "default_tmalign")]
    pub tmalign: String,
}

fn default_rfdiffusion() -> String {
    "./models/RFdiffusion/scripts/run_inference.py".into()
}
fn default_protein_mpnn() -> String {
    "./ProteinMPNN/protein_mpnn_run.py".into()
}
fn default_omegafold() -> String {
    "omegafold".into()
}
fn default_tmalign() -> String {
    "./TMalign".into()
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            rfdiffusion: default_rfdiffusion(),
            protein_mpnn: default_protein_mpnn(),
            omegafold: default_omegafold(),
            tmalign: default_tmalign(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.foldcraft/config.toml).
    ///
    /// Environment variable overrides:
    /// - `FOLDCRAFT_API_KEY` (highest priority), then `ANTHROPIC_API_KEY`
    /// - `FOLDCRAFT_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("FOLDCRAFT_API_KEY")
                .ok()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("FOLDCRAFT_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".foldcraft")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".into(),
            ));
        }
        if self.workspace.root.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "workspace.root must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            workspace: WorkspaceConfig::default(),
            programs: ProgramsConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.workspace.root, "./work_flow");
        assert_eq!(config.programs.omegafold, "omegafold");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.programs.tmalign, config.programs.tmalign);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().max_tokens, 4096);
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_tokens = 0").unwrap();
        let result = AppConfig::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "model = \"claude-sonnet-4-20250514\"\n[programs]\ntmalign = \"/opt/TMalign\""
        )
        .unwrap();
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.programs.tmalign, "/opt/TMalign");
        // Untouched sections keep their defaults
        assert_eq!(config.programs.omegafold, "omegafold");
        assert_eq!(config.workspace.root, "./work_flow");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-ant-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("claude-3-haiku-20240307"));
        assert!(toml_str.contains("work_flow"));
    }
}
