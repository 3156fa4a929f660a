//! `foldcraft setup` — write a starter config and create the workspace.

use foldcraft_config::AppConfig;
use foldcraft_pipeline::WorkflowDirs;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        std::fs::create_dir_all(&config_dir)?;
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("Wrote starter config to {}", config_path.display());
    }

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let dirs = WorkflowDirs::new(&config.workspace.root);
    if dirs.setup()? {
        println!("work_flow folder structure created successfully.");
    } else {
        println!("The folder '{}' already exists.", dirs.root().display());
    }

    if !config.has_api_key() {
        println!();
        println!("No API key found yet. Set FOLDCRAFT_API_KEY or ANTHROPIC_API_KEY,");
        println!("or add api_key to {}", config_path.display());
    }

    Ok(())
}
