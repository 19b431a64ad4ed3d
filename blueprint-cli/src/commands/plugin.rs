//! Plugin listing

use anyhow::Result;
use blueprint_client::BlueprintClient;
use blueprint_compiler::ConnectorRegistry;
use colored::*;

use crate::config::Config;
use crate::render;

pub async fn list_plugins(config: &Config, remote: bool) -> Result<()> {
    let plugins = if remote {
        BlueprintClient::new(&config.orchestrator_url)
            .list_plugins()
            .await?
    } else {
        ConnectorRegistry::with_defaults().plugins()
    };

    if plugins.is_empty() {
        println!("{}", "No connectors registered.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} connector(s):", plugins.len()).bold());
    println!();
    for plugin in &plugins {
        println!("{}", render::plugin_line(plugin));
    }

    Ok(())
}
