//! Scope resolver
//!
//! Turns blueprint scope references into decoded tool scopes and scope
//! configs. The whole batch is resolved before anything is compiled and the
//! first failing reference aborts it.

use std::collections::BTreeSet;

use blueprint_core::domain::blueprint::BlueprintScopeRef;
use blueprint_core::domain::entity::EntitySet;
use blueprint_core::domain::source::ScopeConfig;
use serde_json::{Map, Value};

use crate::connector::Connector;
use crate::error::CompileError;
use crate::store::ScopeStore;

/// A scope reference with everything it points to loaded
pub struct ResolvedScope<C: Connector> {
    pub scope_id: String,
    pub scope: C::Scope,
    pub config: Option<ScopeConfig>,
    /// Entities requested for this scope, before connector adjustments
    pub entities: EntitySet,
}

/// Resolved connection plus its scopes, in request order
pub struct Resolution<C: Connector> {
    pub connection: C::Connection,
    pub scopes: Vec<ResolvedScope<C>>,
}

pub struct ScopeResolver<'s, S: ScopeStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: ScopeStore + ?Sized> ScopeResolver<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub fn resolve<C: Connector>(
        &self,
        connector: &C,
        connection_id: u64,
        refs: &[BlueprintScopeRef],
    ) -> Result<Resolution<C>, CompileError> {
        let plugin = connector.plugin();

        let stored_connection = self
            .store
            .find_connection(plugin, connection_id)?
            .ok_or_else(|| CompileError::ConnectionNotFound {
                plugin: plugin.to_string(),
                connection_id,
            })?;
        let settings = match stored_connection.settings {
            Value::Null => Value::Object(Map::new()),
            settings => settings,
        };
        let connection: C::Connection = serde_json::from_value(settings)
            .map_err(|e| CompileError::Internal {
                scope_id: None,
                message: format!("failed to decode {} connection {}: {}", plugin, connection_id, e),
            })?;

        validate_refs(refs)?;

        let mut scopes = Vec::with_capacity(refs.len());
        for scope_ref in refs {
            scopes.push(self.resolve_one(connector, connection_id, scope_ref)?);
        }

        Ok(Resolution {
            connection,
            scopes,
        })
    }

    fn resolve_one<C: Connector>(
        &self,
        connector: &C,
        connection_id: u64,
        scope_ref: &BlueprintScopeRef,
    ) -> Result<ResolvedScope<C>, CompileError> {
        let plugin = connector.plugin();
        let scope_id = scope_ref.scope_id.as_str();

        let stored = self
            .store
            .find_scope(plugin, connection_id, scope_id)?
            .ok_or_else(|| CompileError::ScopeNotFound {
                connection_id,
                scope_id: scope_id.to_string(),
            })?;

        // An explicit reference wins over the config stored on the scope;
        // a stored id of 0 means the scope has no config.
        let config_id = scope_ref
            .scope_config_id
            .or(stored.scope_config_id.filter(|id| *id != 0));

        let scope: C::Scope = serde_json::from_value(stored.data).map_err(|e| {
            CompileError::internal(scope_id, format!("failed to decode scope: {}", e))
        })?;

        let config = match config_id {
            Some(id) => Some(self.store.find_scope_config(plugin, id)?.ok_or_else(|| {
                CompileError::ScopeConfigNotFound {
                    scope_id: scope_id.to_string(),
                    scope_config_id: id,
                }
            })?),
            None => None,
        };

        let entities = if scope_ref.entities.is_empty() {
            config
                .as_ref()
                .map(|c| c.entities.clone())
                .unwrap_or_default()
        } else {
            scope_ref.entities.clone()
        };

        tracing::trace!(
            plugin,
            connection_id,
            scope_id,
            scope_config_id = ?config_id,
            "Resolved scope"
        );

        Ok(ResolvedScope {
            scope_id: scope_id.to_string(),
            scope,
            config,
            entities,
        })
    }
}

fn validate_refs(refs: &[BlueprintScopeRef]) -> Result<(), CompileError> {
    let mut seen = BTreeSet::new();
    for scope_ref in refs {
        let scope_id = scope_ref.scope_id.as_str();
        if scope_id.trim().is_empty() {
            return Err(CompileError::BadInput {
                scope_id: None,
                message: "scope id cannot be empty".to_string(),
            });
        }
        if scope_ref.scope_config_id == Some(0) {
            return Err(CompileError::bad_input(scope_id, "scope config id cannot be 0"));
        }
        if !seen.insert(scope_id) {
            return Err(CompileError::bad_input(
                scope_id,
                "scope is listed more than once",
            ));
        }
    }
    Ok(())
}
