//! foldcraft CLI — the main entry point.
//!
//! Commands:
//! - `setup`    — Write a starter config and create the work_flow folders
//! - `chat`     — Interactive protein-design chat session
//! - `pipeline` — Run the full design pipeline for one PDB code
//! - `compare`  — TM-align two structures and print the report

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "foldcraft",
    about = "Protein design chatbot driving RFdiffusion, ProteinMPNN, OmegaFold and TM-align",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file and create the workspace folders
    Setup,

    /// Chat with the protein-design assistant
    Chat {
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Run the full design pipeline for one PDB code
    Pipeline {
        /// PDB code of the native protein (e.g. 5AN7)
        pdb_code: String,

        /// Contig string describing the backbone, e.g. "[A17-145/0 50-60]"
        residues: String,
    },

    /// Align two structures with TM-align and print the report
    Compare {
        /// Reference structure (.pdb)
        reference: String,

        /// Generated structure (.pdb)
        generated: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Setup => commands::setup::run().await?,
        Commands::Chat { model } => commands::chat::run(model).await?,
        Commands::Pipeline { pdb_code, residues } => {
            commands::pipeline::run(&pdb_code, &residues).await?
        }
        Commands::Compare {
            reference,
            generated,
        } => commands::compare::run(&reference, &generated).await?,
    }

    Ok(())
}
