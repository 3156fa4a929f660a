//! `foldcraft chat` — the interactive protein-design session.

use std::io::Write;
use std::sync::Arc;

use tracing::error;

use foldcraft_agent::{ChatSession, TurnObserver, TurnOutcome};
use foldcraft_config::AppConfig;
use foldcraft_core::error::Error;
use foldcraft_pipeline::{TokioProcessRunner, WorkflowDirs};
use foldcraft_providers::AnthropicChat;

/// Prints each assistant text fragment as it streams in.
struct StdoutObserver;

impl TurnObserver for StdoutObserver {
    fn on_text(&mut self, fragment: &str) {
        print!("{fragment}");
        let _ = std::io::stdout().flush();
    }
}

pub async fn run(model_override: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    FOLDCRAFT_API_KEY=sk-ant-...");
        eprintln!("    ANTHROPIC_API_KEY=sk-ant-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let dirs = WorkflowDirs::new(&config.workspace.root);
    if dirs.setup().map_err(|e| e.to_string())? {
        println!("work_flow folder structure created successfully.");
    }

    let provider = Arc::new(AnthropicChat::new(api_key));
    let tools = Arc::new(foldcraft_tools::default_registry(
        Arc::new(TokioProcessRunner),
        dirs,
        &config.programs.rfdiffusion,
    ));
    let model = model_override.unwrap_or_else(|| config.model.clone());
    let mut session = ChatSession::new(provider, tools, model, config.max_tokens);

    let stdin = std::io::stdin();
    loop {
        print!("User message to chatbot: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        match session.run_line(line.trim(), &mut StdoutObserver).await {
            Ok(TurnOutcome::Ended) => {
                println!("Goodbye!");
                break;
            }
            Ok(TurnOutcome::Continue) => {
                println!();
            }
            Err(Error::Provider(e)) => {
                // Transport faults end the session; no retry.
                error!("A client error occurred: {e}");
                println!("A client error occurred: {e}");
                break;
            }
            Err(other) => return Err(other.into()),
        }
    }

    Ok(())
}
