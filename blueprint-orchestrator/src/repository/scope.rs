//! Tool Scope Repository

use blueprint_core::domain::source::StoredScope;
use sqlx::PgPool;

/// Find the listed scopes of one connection. Missing ids are simply absent
/// from the result.
pub async fn find_many(
    pool: &PgPool,
    plugin: &str,
    connection_id: u64,
    scope_ids: &[String],
) -> Result<Vec<StoredScope>, sqlx::Error> {
    let Ok(connection_id) = i64::try_from(connection_id) else {
        return Ok(Vec::new());
    };
    if scope_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, ScopeRow>(
        r#"
        SELECT connection_id, scope_id, name, scope_config_id, data
        FROM tool_scopes
        WHERE plugin = $1 AND connection_id = $2 AND scope_id = ANY($3)
        ORDER BY scope_id
        "#,
    )
    .bind(plugin)
    .bind(connection_id)
    .bind(scope_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ScopeRow {
    connection_id: i64,
    scope_id: String,
    name: String,
    scope_config_id: Option<i64>,
    data: serde_json::Value,
}

impl From<ScopeRow> for StoredScope {
    fn from(row: ScopeRow) -> Self {
        StoredScope {
            connection_id: row.connection_id as u64,
            scope_id: row.scope_id,
            name: row.name,
            scope_config_id: row.scope_config_id.map(|id| id as u64),
            data: row.data,
        }
    }
}
