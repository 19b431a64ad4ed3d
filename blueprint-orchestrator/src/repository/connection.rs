//! Connection Repository

use blueprint_core::domain::source::StoredConnection;
use sqlx::PgPool;

/// Find a connection by plugin and id
pub async fn find(
    pool: &PgPool,
    plugin: &str,
    id: u64,
) -> Result<Option<StoredConnection>, sqlx::Error> {
    // Ids beyond the BIGINT range cannot exist in the table
    let Ok(id) = i64::try_from(id) else {
        return Ok(None);
    };

    let row = sqlx::query_as::<_, ConnectionRow>(
        r#"
        SELECT plugin, id, name, settings
        FROM connections
        WHERE plugin = $1 AND id = $2
        "#,
    )
    .bind(plugin)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ConnectionRow {
    plugin: String,
    id: i64,
    name: String,
    settings: serde_json::Value,
}

impl From<ConnectionRow> for StoredConnection {
    fn from(row: ConnectionRow) -> Self {
        StoredConnection {
            id: row.id as u64,
            plugin: row.plugin,
            name: row.name,
            settings: row.settings,
        }
    }
}
