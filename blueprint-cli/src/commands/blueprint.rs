//! Compile and plan command handlers

use anyhow::{Context, Result};
use blueprint_client::{BlueprintClient, ClientError};
use blueprint_compiler::{BlueprintPlanner, ConnectorRegistry, MemoryStore};
use blueprint_core::domain::blueprint::BlueprintSettings;
use blueprint_core::dto::compile::{CompileRequest, CompileResponse};

use super::read_json;
use crate::config::Config;
use crate::render;

pub async fn compile(
    config: &Config,
    request_path: &str,
    fixtures: Option<&str>,
    json: bool,
) -> Result<()> {
    let req: CompileRequest = read_json(request_path, "compile request")?;

    let response = match fixtures {
        Some(path) => {
            let store = load_fixtures(path)?;
            ConnectorRegistry::with_defaults()
                .compile(&store, &req)
                .context("Compilation failed")?
        }
        None => BlueprintClient::new(&config.orchestrator_url)
            .compile(&req)
            .await
            .map_err(|e| remote_failure(e, "Compilation failed"))?,
    };

    print(&response, json)
}

pub async fn plan(
    config: &Config,
    settings_path: &str,
    fixtures: Option<&str>,
    json: bool,
) -> Result<()> {
    let settings: BlueprintSettings = read_json(settings_path, "blueprint settings")?;

    let response = match fixtures {
        Some(path) => {
            let store = load_fixtures(path)?;
            let registry = ConnectorRegistry::with_defaults();
            BlueprintPlanner::new(&registry)
                .plan(&store, &settings)
                .context("Planning failed")?
        }
        None => BlueprintClient::new(&config.orchestrator_url)
            .plan(&settings)
            .await
            .map_err(|e| remote_failure(e, "Planning failed"))?,
    };

    print(&response, json)
}

/// Name the offending scope up front when the orchestrator blamed one
fn remote_failure(err: ClientError, action: &str) -> anyhow::Error {
    let context = match err.rejected_scope() {
        Some(scope) => format!("{} for scope '{}'", action, scope),
        None => action.to_string(),
    };
    anyhow::Error::new(err).context(context)
}

fn load_fixtures(path: &str) -> Result<MemoryStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture file: {}", path))?;
    MemoryStore::from_json(&content).with_context(|| format!("Invalid fixture file: {}", path))
}

fn print(response: &CompileResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        render::print_response(response);
    }
    Ok(())
}
