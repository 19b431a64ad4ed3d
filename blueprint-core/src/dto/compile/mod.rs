//! Compile DTOs for inter-service communication

use serde::{Deserialize, Serialize};

use crate::domain::blueprint::{BlueprintScopeRef, SyncPolicy};
use crate::domain::pipeline::PipelinePlan;
use crate::domain::scope::DomainScope;

/// Request to compile the scopes of one connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub plugin: String,
    pub connection_id: u64,
    pub scopes: Vec<BlueprintScopeRef>,
    #[serde(default)]
    pub sync_policy: SyncPolicy,
}

/// Compiled plan plus the domain scopes it populates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    pub plan: PipelinePlan,
    pub scopes: Vec<DomainScope>,
}
