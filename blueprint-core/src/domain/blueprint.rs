//! Blueprint domain types
//!
//! A blueprint is the user's declaration of which scopes to collect, from
//! which connections, and with which entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::EntitySet;
use super::pipeline::PipelinePlan;

/// A user's selection of one scope within a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintScopeRef {
    /// Natural key of the scope within its connection
    pub scope_id: String,

    /// Explicit scope config; falls back to the one stored on the scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_config_id: Option<u64>,

    /// Entities listed on the reference itself (older request style)
    #[serde(default, skip_serializing_if = "EntitySet::is_empty")]
    pub entities: EntitySet,
}

impl BlueprintScopeRef {
    pub fn new(scope_id: impl Into<String>) -> Self {
        Self {
            scope_id: scope_id.into(),
            scope_config_id: None,
            entities: EntitySet::new(),
        }
    }

    pub fn with_scope_config(mut self, scope_config_id: u64) -> Self {
        self.scope_config_id = Some(scope_config_id);
        self
    }

    pub fn with_entities(mut self, entities: impl Into<EntitySet>) -> Self {
        self.entities = entities.into();
        self
    }
}

/// Sync settings applied to every primary task of a compilation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicy {
    /// Only collect data updated after this instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_after: Option<DateTime<Utc>>,

    /// Ignore collector state and re-collect everything
    #[serde(default)]
    pub full_sync: bool,

    /// Drop collector subtasks and only re-run extraction/conversion
    #[serde(default)]
    pub skip_collectors: bool,
}

/// All scopes selected from one connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintConnection {
    pub plugin: String,
    pub connection_id: u64,
    #[serde(default)]
    pub skip_on_fail: bool,
    pub scopes: Vec<BlueprintScopeRef>,
}

/// Full blueprint settings spanning several connections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintSettings {
    pub connections: Vec<BlueprintConnection>,

    #[serde(default)]
    pub sync_policy: SyncPolicy,

    /// Stages run before the generated plan
    #[serde(default, skip_serializing_if = "PipelinePlan::is_empty")]
    pub before_plan: PipelinePlan,

    /// Stages run after the generated plan
    #[serde(default, skip_serializing_if = "PipelinePlan::is_empty")]
    pub after_plan: PipelinePlan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EntityTag;

    #[test]
    fn test_scope_ref_deserializes_v200_shape() {
        let json = r#"{"scopeId":"42","scopeConfigId":7,"entities":["CODE","CICD"]}"#;
        let scope: BlueprintScopeRef = serde_json::from_str(json).unwrap();
        assert_eq!(scope.scope_id, "42");
        assert_eq!(scope.scope_config_id, Some(7));
        assert!(scope.entities.contains(EntityTag::Cicd));
    }

    #[test]
    fn test_scope_ref_entities_are_optional() {
        let scope: BlueprintScopeRef = serde_json::from_str(r#"{"scopeId":"a/b"}"#).unwrap();
        assert!(scope.entities.is_empty());
        assert!(scope.scope_config_id.is_none());
    }

    #[test]
    fn test_sync_policy_time_after() {
        let json = r#"{"timeAfter":"2024-01-02T03:04:05Z"}"#;
        let policy: SyncPolicy = serde_json::from_str(json).unwrap();
        assert!(policy.time_after.is_some());
        assert!(!policy.full_sync);
        assert!(!policy.skip_collectors);
    }
}
