//! Blueprint CLI
//!
//! Command-line interface for compiling blueprints into pipeline plans,
//! either locally against a fixture file or through the orchestrator.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Blueprint to pipeline compiler CLI", long_about = None)]
struct Cli {
    /// Orchestrator URL
    #[arg(
        long,
        env = "BLUEPRINT_ORCHESTRATOR_URL",
        default_value = "http://localhost:8080"
    )]
    orchestrator_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Compiler warnings go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config {
        orchestrator_url: cli.orchestrator_url,
    };

    handle_command(cli.command, &config).await
}
