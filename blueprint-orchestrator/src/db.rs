use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Connections, keyed by plugin and connector-local id
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS connections (
            plugin VARCHAR(100) NOT NULL,
            id BIGINT NOT NULL,
            name VARCHAR(255) NOT NULL,
            settings JSONB NOT NULL DEFAULT '{}',
            PRIMARY KEY (plugin, id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Tool scopes selected under a connection
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tool_scopes (
            plugin VARCHAR(100) NOT NULL,
            connection_id BIGINT NOT NULL,
            scope_id VARCHAR(500) NOT NULL,
            name VARCHAR(500) NOT NULL,
            scope_config_id BIGINT,
            data JSONB NOT NULL DEFAULT '{}',
            PRIMARY KEY (plugin, connection_id, scope_id),
            FOREIGN KEY (plugin, connection_id)
                REFERENCES connections(plugin, id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scope_configs (
            plugin VARCHAR(100) NOT NULL,
            id BIGINT NOT NULL,
            name VARCHAR(255) NOT NULL DEFAULT '',
            entities TEXT[] NOT NULL DEFAULT '{}',
            refdiff JSONB,
            deployment_pattern TEXT,
            production_pattern TEXT,
            PRIMARY KEY (plugin, id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_tool_scopes_config ON tool_scopes(plugin, scope_config_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
