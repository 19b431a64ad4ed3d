//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod blueprint;
mod plugin;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::de::DeserializeOwned;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compile the scopes of one connection
    Compile {
        /// Path to a compile request (JSON)
        #[arg(short, long)]
        request: String,

        /// Compile locally against this fixture store instead of the orchestrator
        #[arg(short, long)]
        fixtures: Option<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Plan a whole blueprint spanning several connections
    Plan {
        /// Path to blueprint settings (JSON)
        #[arg(short, long)]
        settings: String,

        /// Plan locally against this fixture store instead of the orchestrator
        #[arg(short, long)]
        fixtures: Option<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// List the connectors the compiler can plan for
    Plugins {
        /// Ask the orchestrator instead of the local registry
        #[arg(long)]
        remote: bool,
    },
}

/// Route a command to its handler
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Compile {
            request,
            fixtures,
            json,
        } => blueprint::compile(config, &request, fixtures.as_deref(), json).await,
        Commands::Plan {
            settings,
            fixtures,
            json,
        } => blueprint::plan(config, &settings, fixtures.as_deref(), json).await,
        Commands::Plugins { remote } => plugin::list_plugins(config, remote).await,
    }
}

/// Read and decode a JSON input file
fn read_json<T: DeserializeOwned>(path: &str, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid {} in {}", what, path))
}
