//! Connector policy
//!
//! A connector tells the generic compiler everything that differs between
//! data sources: how its records decode, which subtasks it has, what options
//! its tasks need, which tasks chain after it and which domain scopes its
//! tool scopes become.

use blueprint_core::domain::blueprint::SyncPolicy;
use blueprint_core::domain::entity::{EntitySet, EntityTag};
use blueprint_core::domain::scope::{DomainKind, DomainScope};
use blueprint_core::domain::source::ScopeConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::catalog::SubtaskMeta;
use crate::chain::ChainRule;
use crate::error::CompileError;

/// A connector-specific remote object (repository, board, job, ...)
pub trait ToolScope: DeserializeOwned {
    /// Type name used in generated domain ids
    const TYPE_NAME: &'static str;

    /// Key unique within a connection
    fn natural_key(&self) -> String;

    fn display_name(&self) -> &str;
}

/// Which entities produce which domain scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainMapping {
    pub kind: DomainKind,
    pub entities: &'static [EntityTag],
}

impl DomainMapping {
    pub const fn new(kind: DomainKind, entities: &'static [EntityTag]) -> Self {
        Self { kind, entities }
    }
}

/// Everything known about one scope while it is being compiled
pub struct ScopeContext<'a, C: Connector> {
    pub connection_id: u64,
    pub connection: &'a C::Connection,
    pub scope_id: &'a str,
    pub scope: &'a C::Scope,
    pub config: Option<&'a ScopeConfig>,
    /// Entities in effect for this scope
    pub entities: &'a EntitySet,
    pub domain_id: &'a str,
    pub sync_policy: &'a SyncPolicy,
}

impl<C: Connector> ScopeContext<'_, C> {
    pub fn wants(&self, tag: EntityTag) -> bool {
        self.entities.contains(tag)
    }

    pub fn refdiff(&self) -> Option<&Map<String, Value>> {
        self.config.and_then(|c| c.refdiff.as_ref())
    }

    pub fn production_pattern(&self) -> Option<&str> {
        self.config
            .and_then(|c| c.production_pattern.as_deref())
            .filter(|p| !p.is_empty())
    }

    pub fn deployment_pattern(&self) -> Option<&str> {
        self.config
            .and_then(|c| c.deployment_pattern.as_deref())
            .filter(|p| !p.is_empty())
    }
}

/// Per-connector compilation policy
pub trait Connector: Send + Sync + Sized + 'static {
    /// Decoded connection settings
    type Connection: DeserializeOwned;

    type Scope: ToolScope;

    /// Options of the primary task, encoded into the task's option map
    type Options: Serialize;

    fn plugin(&self) -> &'static str;

    fn catalog(&self) -> &'static [SubtaskMeta];

    /// Plugin name and catalog of the primary task for a connection
    fn task_catalog(&self, _connection: &Self::Connection) -> (&'static str, &'static [SubtaskMeta]) {
        (self.plugin(), self.catalog())
    }

    /// Entities in effect once the user's request is known
    fn effective_entities(&self, _scope: &Self::Scope, requested: EntitySet) -> EntitySet {
        requested
    }

    /// Entities that must never select subtasks for this scope
    fn blocked_entities(&self, _scope: &Self::Scope) -> EntitySet {
        EntitySet::new()
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<Self::Options, CompileError>;

    fn chain_rules(&self) -> Vec<ChainRule<Self>> {
        Vec::new()
    }

    fn domain_mappings(&self) -> &'static [DomainMapping];

    /// Build the domain scope of `kind`, or `None` to suppress it
    fn domain_scope(&self, kind: DomainKind, id: &str, scope: &Self::Scope) -> Option<DomainScope> {
        Some(DomainScope::new(kind, id, scope.display_name()))
    }
}
