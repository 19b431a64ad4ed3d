//! Stored data-source records
//!
//! Connections, tool scopes and scope configs as the persistent store hands
//! them to the compiler. Connector-specific fields stay as JSON payloads and
//! are decoded into typed records by the owning connector.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::EntitySet;

/// A configured connection to a remote tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConnection {
    pub id: u64,
    pub plugin: String,
    pub name: String,

    /// Connector-specific settings (endpoint, credentials, proxy, ...)
    #[serde(default)]
    pub settings: Value,
}

/// A tool-layer scope selected under a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScope {
    pub connection_id: u64,

    /// Natural key within the connection
    pub scope_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_config_id: Option<u64>,

    /// Connector-specific scope fields
    #[serde(default)]
    pub data: Value,
}

/// User configuration attached to a tool scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeConfig {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub entities: EntitySet,

    /// Tag-range diff settings; presence enables the refdiff stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refdiff: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_pattern: Option<String>,
}
