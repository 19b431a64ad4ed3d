//! Scope store
//!
//! The read-only storage interface the compiler resolves blueprint references
//! against, plus an in-memory implementation used for fixtures, tests and
//! request-scoped snapshots.

use std::collections::BTreeMap;

use blueprint_core::domain::source::{ScopeConfig, StoredConnection, StoredScope};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Lookups the compiler needs from persistent storage
///
/// `Ok(None)` means the record does not exist; errors are reserved for the
/// store itself failing.
pub trait ScopeStore {
    fn find_connection(
        &self,
        plugin: &str,
        connection_id: u64,
    ) -> Result<Option<StoredConnection>, StoreError>;

    fn find_scope(
        &self,
        plugin: &str,
        connection_id: u64,
        scope_id: &str,
    ) -> Result<Option<StoredScope>, StoreError>;

    fn find_scope_config(
        &self,
        plugin: &str,
        scope_config_id: u64,
    ) -> Result<Option<ScopeConfig>, StoreError>;
}

/// In-memory store keyed the same way the database tables are
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    connections: BTreeMap<(String, u64), StoredConnection>,
    scopes: BTreeMap<(String, u64, String), StoredScope>,
    scope_configs: BTreeMap<(String, u64), ScopeConfig>,
}

// =============================================================================
// Fixture format
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    #[serde(default)]
    connections: Vec<StoredConnection>,
    #[serde(default)]
    scopes: Vec<PluginScope>,
    #[serde(default)]
    scope_configs: Vec<PluginScopeConfig>,
}

#[derive(Debug, Deserialize)]
struct PluginScope {
    plugin: String,
    #[serde(flatten)]
    scope: StoredScope,
}

#[derive(Debug, Deserialize)]
struct PluginScopeConfig {
    plugin: String,
    #[serde(flatten)]
    config: ScopeConfig,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON fixture:
    /// `{"connections": [...], "scopes": [...], "scopeConfigs": [...]}` where
    /// scopes and scope configs carry an extra `plugin` field.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let fixture: Fixture = serde_json::from_str(json)?;

        let mut store = Self::new();
        for connection in fixture.connections {
            store.insert_connection(connection);
        }
        for entry in fixture.scopes {
            store.insert_scope(&entry.plugin, entry.scope);
        }
        for entry in fixture.scope_configs {
            store.insert_scope_config(&entry.plugin, entry.config);
        }
        Ok(store)
    }

    pub fn insert_connection(&mut self, connection: StoredConnection) {
        self.connections
            .insert((connection.plugin.clone(), connection.id), connection);
    }

    pub fn insert_scope(&mut self, plugin: &str, scope: StoredScope) {
        self.scopes.insert(
            (plugin.to_string(), scope.connection_id, scope.scope_id.clone()),
            scope,
        );
    }

    pub fn insert_scope_config(&mut self, plugin: &str, config: ScopeConfig) {
        self.scope_configs
            .insert((plugin.to_string(), config.id), config);
    }

    pub fn with_connection(mut self, connection: StoredConnection) -> Self {
        self.insert_connection(connection);
        self
    }

    pub fn with_scope(mut self, plugin: &str, scope: StoredScope) -> Self {
        self.insert_scope(plugin, scope);
        self
    }

    pub fn with_scope_config(mut self, plugin: &str, config: ScopeConfig) -> Self {
        self.insert_scope_config(plugin, config);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty() && self.scopes.is_empty() && self.scope_configs.is_empty()
    }
}

impl ScopeStore for MemoryStore {
    fn find_connection(
        &self,
        plugin: &str,
        connection_id: u64,
    ) -> Result<Option<StoredConnection>, StoreError> {
        Ok(self
            .connections
            .get(&(plugin.to_string(), connection_id))
            .cloned())
    }

    fn find_scope(
        &self,
        plugin: &str,
        connection_id: u64,
        scope_id: &str,
    ) -> Result<Option<StoredScope>, StoreError> {
        Ok(self
            .scopes
            .get(&(plugin.to_string(), connection_id, scope_id.to_string()))
            .cloned())
    }

    fn find_scope_config(
        &self,
        plugin: &str,
        scope_config_id: u64,
    ) -> Result<Option<ScopeConfig>, StoreError> {
        Ok(self
            .scope_configs
            .get(&(plugin.to_string(), scope_config_id))
            .cloned())
    }
}

impl<S: ScopeStore + ?Sized> ScopeStore for &S {
    fn find_connection(
        &self,
        plugin: &str,
        connection_id: u64,
    ) -> Result<Option<StoredConnection>, StoreError> {
        (**self).find_connection(plugin, connection_id)
    }

    fn find_scope(
        &self,
        plugin: &str,
        connection_id: u64,
        scope_id: &str,
    ) -> Result<Option<StoredScope>, StoreError> {
        (**self).find_scope(plugin, connection_id, scope_id)
    }

    fn find_scope_config(
        &self,
        plugin: &str,
        scope_config_id: u64,
    ) -> Result<Option<ScopeConfig>, StoreError> {
        (**self).find_scope_config(plugin, scope_config_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "connections": [
            {"id": 1, "plugin": "github", "name": "gh", "settings": {"token": "t"}}
        ],
        "scopes": [
            {"plugin": "github", "connectionId": 1, "scopeId": "42", "name": "o/r",
             "scopeConfigId": 5, "data": {"githubId": 42}}
        ],
        "scopeConfigs": [
            {"plugin": "github", "id": 5, "entities": ["CODE"]}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let store = MemoryStore::from_json(FIXTURE).unwrap();

        let connection = store.find_connection("github", 1).unwrap().unwrap();
        assert_eq!(connection.name, "gh");

        let scope = store.find_scope("github", 1, "42").unwrap().unwrap();
        assert_eq!(scope.scope_config_id, Some(5));
        assert_eq!(scope.data["githubId"], 42);

        assert!(store.find_scope_config("github", 5).unwrap().is_some());
    }

    #[test]
    fn test_lookups_are_plugin_scoped() {
        let store = MemoryStore::from_json(FIXTURE).unwrap();
        assert!(store.find_connection("gitlab", 1).unwrap().is_none());
        assert!(store.find_scope("github", 2, "42").unwrap().is_none());
        assert!(store.find_scope_config("gitlab", 5).unwrap().is_none());
    }

    #[test]
    fn test_invalid_fixture() {
        let result = MemoryStore::from_json("{\"connections\": 3}");
        assert!(matches!(result, Err(StoreError::Fixture(_))));
    }
}
