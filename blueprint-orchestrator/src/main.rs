use anyhow::Context;
use blueprint_compiler::ConnectorRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blueprint_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Blueprint Orchestrator...");

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Connecting to database...");

    let pool = db::create_pool(&config)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Database connection pool created");

    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let registry = ConnectorRegistry::with_defaults();
    tracing::info!(plugins = registry.plugins().len(), "Connectors registered");

    // Build router with all API endpoints
    let app = api::create_router(api::AppState::new(pool, registry));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
