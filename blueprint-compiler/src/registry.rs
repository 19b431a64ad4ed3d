//! Connector registry
//!
//! Maps plugin names to compilers so callers can compile requests for any
//! registered connector without knowing its concrete policy type.

use std::collections::BTreeMap;

use blueprint_core::domain::blueprint::{BlueprintScopeRef, SyncPolicy};
use blueprint_core::dto::compile::{CompileRequest, CompileResponse};
use blueprint_core::dto::plugin::PluginSummary;

use crate::catalog::catalog_entities;
use crate::compiler::PlanCompiler;
use crate::connector::{Connector, ToolScope};
use crate::connectors;
use crate::error::CompileError;
use crate::store::ScopeStore;

/// Object-safe view of a [`PlanCompiler`]
pub trait PlanSource: Send + Sync {
    fn plugin(&self) -> &'static str;

    fn summary(&self) -> PluginSummary;

    fn compile(
        &self,
        store: &dyn ScopeStore,
        connection_id: u64,
        refs: &[BlueprintScopeRef],
        sync_policy: &SyncPolicy,
    ) -> Result<CompileResponse, CompileError>;
}

impl<C: Connector> PlanSource for PlanCompiler<C> {
    fn plugin(&self) -> &'static str {
        self.connector().plugin()
    }

    fn summary(&self) -> PluginSummary {
        let catalog = self.connector().catalog();
        PluginSummary {
            plugin: self.connector().plugin().to_string(),
            scope_type: C::Scope::TYPE_NAME.to_string(),
            subtask_count: catalog.len(),
            entities: catalog_entities(catalog),
        }
    }

    fn compile(
        &self,
        store: &dyn ScopeStore,
        connection_id: u64,
        refs: &[BlueprintScopeRef],
        sync_policy: &SyncPolicy,
    ) -> Result<CompileResponse, CompileError> {
        PlanCompiler::compile(self, store, connection_id, refs, sync_policy)
    }
}

#[derive(Default)]
pub struct ConnectorRegistry {
    sources: BTreeMap<&'static str, Box<dyn PlanSource>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every bundled connector
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(connectors::github::Github);
        registry.register(connectors::gitlab::Gitlab);
        registry.register(connectors::bitbucket::Bitbucket);
        registry.register(connectors::azuredevops::AzureDevOps);
        registry.register(connectors::gitee::Gitee);
        registry.register(connectors::jira::Jira);
        registry.register(connectors::jenkins::Jenkins);
        registry.register(connectors::bamboo::Bamboo);
        registry.register(connectors::sonarqube::Sonarqube);
        registry
    }

    /// Register a connector, replacing any previous one with the same plugin
    pub fn register<C: Connector>(&mut self, connector: C) {
        let plugin = connector.plugin();
        if self
            .sources
            .insert(plugin, Box::new(PlanCompiler::new(connector)))
            .is_some()
        {
            tracing::warn!(plugin, "Connector registered twice; keeping the latest");
        }
    }

    pub fn get(&self, plugin: &str) -> Result<&dyn PlanSource, CompileError> {
        self.sources
            .get(plugin)
            .map(|source| source.as_ref())
            .ok_or_else(|| CompileError::PluginNotFound(plugin.to_string()))
    }

    pub fn contains(&self, plugin: &str) -> bool {
        self.sources.contains_key(plugin)
    }

    /// Summaries of all registered connectors, sorted by plugin name
    pub fn plugins(&self) -> Vec<PluginSummary> {
        self.sources.values().map(|source| source.summary()).collect()
    }

    pub fn compile(
        &self,
        store: &dyn ScopeStore,
        request: &CompileRequest,
    ) -> Result<CompileResponse, CompileError> {
        self.get(&request.plugin)?.compile(
            store,
            request.connection_id,
            &request.scopes,
            &request.sync_policy,
        )
    }
}
