//! Plugin DTOs
//!
//! Data transfer objects describing the registered connectors.

use serde::{Deserialize, Serialize};

use crate::domain::entity::EntitySet;

/// Summary of a connector the compiler knows how to plan for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    /// Plugin name used in blueprints and task records
    pub plugin: String,

    /// Type name of the connector's tool scope
    pub scope_type: String,

    /// Number of subtasks in the connector's catalog
    pub subtask_count: usize,

    /// Entities at least one catalog subtask contributes to
    pub entities: EntitySet,
}
