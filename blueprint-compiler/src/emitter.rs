//! Domain scope emitter

use blueprint_core::domain::scope::DomainScope;

use crate::connector::{Connector, ScopeContext, ToolScope};
use crate::error::CompileError;
use crate::idgen::DomainIdGenerator;

/// Derives domain ids and domain scopes for one connector's tool scopes
pub struct DomainScopeEmitter<'c, C: Connector> {
    connector: &'c C,
    idgen: DomainIdGenerator,
}

impl<'c, C: Connector> DomainScopeEmitter<'c, C> {
    pub fn new(connector: &'c C) -> Result<Self, CompileError> {
        let idgen = DomainIdGenerator::new(connector.plugin(), C::Scope::TYPE_NAME)?;
        Ok(Self { connector, idgen })
    }

    pub fn domain_id(&self, connection_id: u64, scope: &C::Scope) -> String {
        self.idgen.generate(connection_id, scope.natural_key())
    }

    /// One domain scope per mapping whose entities were requested, in the
    /// connector's mapping order. All of them share the scope's domain id.
    pub fn emit(&self, ctx: &ScopeContext<'_, C>) -> Vec<DomainScope> {
        self.connector
            .domain_mappings()
            .iter()
            .filter(|mapping| ctx.entities.contains_any(mapping.entities))
            .filter_map(|mapping| {
                self.connector
                    .domain_scope(mapping.kind, ctx.domain_id, ctx.scope)
            })
            .collect()
    }
}
