//! Compile Service
//!
//! Loads the records a request references into an in-memory snapshot and
//! runs the compiler over it. The compiler itself never touches the
//! database.

use std::collections::BTreeSet;

use blueprint_compiler::{BlueprintPlanner, CompileError, ConnectorRegistry, MemoryStore};
use blueprint_core::domain::blueprint::{BlueprintScopeRef, BlueprintSettings};
use blueprint_core::domain::source::StoredScope;
use blueprint_core::dto::compile::{CompileRequest, CompileResponse};
use blueprint_core::dto::plugin::PluginSummary;
use sqlx::PgPool;

use crate::repository::{connection_repository, scope_config_repository, scope_repository};

/// Service error type
#[derive(Debug)]
pub enum CompileServiceError {
    Compile(CompileError),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for CompileServiceError {
    fn from(err: sqlx::Error) -> Self {
        CompileServiceError::DatabaseError(err)
    }
}

impl From<CompileError> for CompileServiceError {
    fn from(err: CompileError) -> Self {
        CompileServiceError::Compile(err)
    }
}

pub type Result<T> = std::result::Result<T, CompileServiceError>;

/// Compile the scopes of a single connection
pub async fn compile(
    pool: &PgPool,
    registry: &ConnectorRegistry,
    req: CompileRequest,
) -> Result<CompileResponse> {
    // Unknown plugins fail before any query runs
    registry.get(&req.plugin)?;

    let mut store = MemoryStore::new();
    load_connection(pool, &mut store, &req.plugin, req.connection_id, &req.scopes).await?;

    let response = registry.compile(&store, &req)?;
    Ok(response)
}

/// Compile every connection of a blueprint into one plan
pub async fn plan(
    pool: &PgPool,
    registry: &ConnectorRegistry,
    settings: BlueprintSettings,
) -> Result<CompileResponse> {
    for connection in &settings.connections {
        registry.get(&connection.plugin)?;
    }

    let mut store = MemoryStore::new();
    for connection in &settings.connections {
        load_connection(
            pool,
            &mut store,
            &connection.plugin,
            connection.connection_id,
            &connection.scopes,
        )
        .await?;
    }

    let response = BlueprintPlanner::new(registry).plan(&store, &settings)?;
    Ok(response)
}

pub fn list_plugins(registry: &ConnectorRegistry) -> Vec<PluginSummary> {
    registry.plugins()
}

/// Copy a connection, the referenced scopes and their scope configs into
/// the snapshot. Absent rows are left out; the compiler reports them.
async fn load_connection(
    pool: &PgPool,
    store: &mut MemoryStore,
    plugin: &str,
    connection_id: u64,
    refs: &[BlueprintScopeRef],
) -> Result<()> {
    if let Some(connection) = connection_repository::find(pool, plugin, connection_id).await? {
        store.insert_connection(connection);
    }

    let scope_ids: Vec<String> = refs.iter().map(|r| r.scope_id.clone()).collect();
    let scopes = scope_repository::find_many(pool, plugin, connection_id, &scope_ids).await?;

    let config_ids = referenced_config_ids(refs, &scopes);
    for config in scope_config_repository::find_many(pool, plugin, &config_ids).await? {
        store.insert_scope_config(plugin, config);
    }
    for scope in scopes {
        store.insert_scope(plugin, scope);
    }

    tracing::debug!(
        plugin,
        connection_id,
        scopes = scope_ids.len(),
        scope_configs = config_ids.len(),
        "Loaded compile snapshot"
    );

    Ok(())
}

/// Scope config ids named by the refs or stored on the scopes
fn referenced_config_ids(refs: &[BlueprintScopeRef], scopes: &[StoredScope]) -> Vec<u64> {
    let ids: BTreeSet<u64> = refs
        .iter()
        .filter_map(|r| r.scope_config_id)
        .chain(scopes.iter().filter_map(|s| s.scope_config_id))
        .filter(|id| *id != 0)
        .collect();
    ids.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope(id: &str, scope_config_id: Option<u64>) -> StoredScope {
        StoredScope {
            connection_id: 1,
            scope_id: id.to_string(),
            name: id.to_string(),
            scope_config_id,
            data: json!({}),
        }
    }

    #[test]
    fn test_referenced_config_ids() {
        let refs = [
            BlueprintScopeRef::new("a").with_scope_config(7),
            BlueprintScopeRef::new("b"),
        ];
        let scopes = [scope("a", Some(2)), scope("b", Some(0)), scope("c", Some(7))];

        assert_eq!(referenced_config_ids(&refs, &scopes), vec![2, 7]);
    }

    #[test]
    fn test_referenced_config_ids_empty() {
        assert!(referenced_config_ids(&[], &[]).is_empty());
    }
}
