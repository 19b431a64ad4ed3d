//! Plan compiler
//!
//! Runs resolution, subtask filtering, stage assembly and domain scope
//! emission for every scope of one connection and stitches the results into
//! a single plan. Compilation is all-or-nothing.

use blueprint_core::domain::blueprint::{BlueprintScopeRef, SyncPolicy};
use blueprint_core::domain::pipeline::{PipelinePlan, PipelineStage};
use blueprint_core::dto::compile::CompileResponse;

use crate::assembler::StageAssembler;
use crate::catalog::EntityFilter;
use crate::connector::{Connector, ScopeContext};
use crate::emitter::DomainScopeEmitter;
use crate::error::CompileError;
use crate::resolver::ScopeResolver;
use crate::store::ScopeStore;

/// Compilation progress, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Filtering,
    Assembling,
    Emitting,
    Done,
    Failed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Resolving => write!(f, "resolving"),
            Phase::Filtering => write!(f, "filtering"),
            Phase::Assembling => write!(f, "assembling"),
            Phase::Emitting => write!(f, "emitting"),
            Phase::Done => write!(f, "done"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

/// Generic compiler driven by a connector policy
#[derive(Debug, Clone, Default)]
pub struct PlanCompiler<C: Connector> {
    connector: C,
}

impl<C: Connector> PlanCompiler<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Compile the scopes of one connection into a plan and domain scopes.
    ///
    /// Each scope gets its own primary stage, in request order. Stages
    /// produced by new-stage chain rules are appended after all primary
    /// stages. The first error aborts the whole compilation.
    pub fn compile<S: ScopeStore + ?Sized>(
        &self,
        store: &S,
        connection_id: u64,
        refs: &[BlueprintScopeRef],
        sync_policy: &SyncPolicy,
    ) -> Result<CompileResponse, CompileError> {
        let plugin = self.connector.plugin();
        let mut phase = Phase::Resolving;

        let result = self.run(store, connection_id, refs, sync_policy, &mut phase);
        match &result {
            Ok(response) => {
                tracing::info!(
                    plugin,
                    connection_id,
                    stages = response.plan.len(),
                    tasks = response.plan.task_count(),
                    scopes = response.scopes.len(),
                    "Blueprint compiled"
                );
            }
            Err(e) => {
                tracing::warn!(
                    plugin,
                    connection_id,
                    phase = %phase,
                    scope_id = e.scope_id().unwrap_or_default(),
                    error = %e,
                    "Blueprint compilation failed"
                );
                enter(&mut phase, Phase::Failed, plugin, connection_id);
            }
        }
        result
    }

    fn run<S: ScopeStore + ?Sized>(
        &self,
        store: &S,
        connection_id: u64,
        refs: &[BlueprintScopeRef],
        sync_policy: &SyncPolicy,
        phase: &mut Phase,
    ) -> Result<CompileResponse, CompileError> {
        let connector = &self.connector;
        let plugin = connector.plugin();

        enter(phase, Phase::Resolving, plugin, connection_id);
        let resolution = ScopeResolver::new(store).resolve(connector, connection_id, refs)?;

        let emitter = DomainScopeEmitter::new(connector)?;
        let assembler = StageAssembler::new(connector);
        let (task_plugin, catalog) = connector.task_catalog(&resolution.connection);
        let filter = EntityFilter::new(catalog).skip_collectors(sync_policy.skip_collectors);

        let mut primary_stages: Vec<PipelineStage> = Vec::with_capacity(resolution.scopes.len());
        let mut extra_stages: Vec<PipelineStage> = Vec::new();
        let mut scopes = Vec::new();

        for resolved in &resolution.scopes {
            let domain_id = emitter.domain_id(connection_id, &resolved.scope);
            let entities = connector.effective_entities(&resolved.scope, resolved.entities.clone());
            let ctx = ScopeContext::<C> {
                connection_id,
                connection: &resolution.connection,
                scope_id: &resolved.scope_id,
                scope: &resolved.scope,
                config: resolved.config.as_ref(),
                entities: &entities,
                domain_id: &domain_id,
                sync_policy,
            };

            enter(phase, Phase::Filtering, plugin, connection_id);
            let blocked = connector.blocked_entities(&resolved.scope);
            let subtasks = filter.select_excluding(&entities, &blocked);
            if subtasks.is_empty() {
                tracing::warn!(
                    plugin,
                    scope_id = %resolved.scope_id,
                    entities = ?entities,
                    "No subtasks selected; emitting task without subtasks"
                );
            }

            enter(phase, Phase::Assembling, plugin, connection_id);
            let assembly = assembler.assemble(&ctx, task_plugin, subtasks)?;
            primary_stages.push(assembly.stage);
            extra_stages.extend(assembly.extra_stages);

            enter(phase, Phase::Emitting, plugin, connection_id);
            scopes.extend(emitter.emit(&ctx));
        }

        enter(phase, Phase::Done, plugin, connection_id);

        let mut plan = PipelinePlan::from_stages(primary_stages);
        for stage in extra_stages {
            plan.push_stage(stage);
        }

        Ok(CompileResponse { plan, scopes })
    }
}

fn enter(phase: &mut Phase, next: Phase, plugin: &str, connection_id: u64) {
    if *phase != next {
        tracing::debug!(plugin, connection_id, from = %phase, to = %next, "Compilation phase");
    }
    *phase = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::azuredevops::AzureDevOps;
    use crate::error::ErrorKind;
    use crate::store::MemoryStore;
    use blueprint_core::domain::entity::EntityTag;
    use blueprint_core::domain::source::{ScopeConfig, StoredConnection, StoredScope};
    use serde_json::json;

    const PLUGIN: &str = "azuredevops_go";

    fn repo(id: &str, private: bool) -> StoredScope {
        StoredScope {
            connection_id: 1,
            scope_id: id.to_string(),
            name: id.to_string(),
            scope_config_id: Some(1),
            data: json!({
                "id": id,
                "name": format!("repo-{}", id),
                "organizationId": "org",
                "projectId": "proj",
                "remoteUrl": format!("https://dev.azure.com/org/proj/_git/{}", id),
                "type": "TfsGit",
                "isPrivate": private
            }),
        }
    }

    fn store(config: ScopeConfig) -> MemoryStore {
        MemoryStore::new()
            .with_connection(StoredConnection {
                id: 1,
                plugin: PLUGIN.to_string(),
                name: "ado".to_string(),
                settings: json!({"token": "pat"}),
            })
            .with_scope(PLUGIN, repo("a", false))
            .with_scope(PLUGIN, repo("b", false))
            .with_scope(PLUGIN, repo("c", true))
            .with_scope_config(PLUGIN, config)
    }

    fn refdiff_config() -> ScopeConfig {
        ScopeConfig {
            id: 1,
            entities: [EntityTag::Code, EntityTag::Cicd].into(),
            refdiff: json!({"tagsLimit": 10}).as_object().cloned(),
            ..Default::default()
        }
    }

    fn compile(store: &MemoryStore, ids: &[&str]) -> Result<CompileResponse, CompileError> {
        let refs: Vec<_> = ids.iter().map(|id| BlueprintScopeRef::new(*id)).collect();
        PlanCompiler::new(AzureDevOps).compile(store, 1, &refs, &SyncPolicy::default())
    }

    #[test]
    fn test_extra_stages_follow_all_primary_stages() {
        let store = store(refdiff_config());
        let response = compile(&store, &["a", "b"]).unwrap();

        let plugins: Vec<Vec<&str>> = response
            .plan
            .stages()
            .iter()
            .map(|stage| stage.iter().map(|t| t.plugin.as_str()).collect())
            .collect();
        assert_eq!(
            plugins,
            vec![
                vec![PLUGIN, "gitextractor"],
                vec![PLUGIN, "gitextractor"],
                vec!["refdiff"],
                vec!["refdiff"],
            ]
        );
    }

    #[test]
    fn test_private_repo_has_no_extraction() {
        let store = store(refdiff_config());
        let response = compile(&store, &["c"]).unwrap();

        assert_eq!(response.plan.stages()[0].len(), 1);
        assert_eq!(response.plan.stages()[0][0].plugin, PLUGIN);
        // Only the CICD scope survives for a private repository
        assert_eq!(response.scopes.len(), 1);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let store = store(refdiff_config());
        let first = serde_json::to_string(&compile(&store, &["b", "a", "c"]).unwrap()).unwrap();
        let second = serde_json::to_string(&compile(&store, &["b", "a", "c"]).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failure_returns_no_plan() {
        let store = store(refdiff_config());
        let err = compile(&store, &["a", "missing", "b"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.scope_id(), Some("missing"));
    }

    #[test]
    fn test_empty_request_yields_empty_plan() {
        let store = store(refdiff_config());
        let response = compile(&store, &[]).unwrap();
        assert!(response.plan.is_empty());
        assert!(response.scopes.is_empty());
    }

    #[test]
    fn test_skip_collectors() {
        let store = store(refdiff_config());
        let refs = [BlueprintScopeRef::new("a")];
        let policy = SyncPolicy {
            skip_collectors: true,
            ..Default::default()
        };
        let response = PlanCompiler::new(AzureDevOps)
            .compile(&store, 1, &refs, &policy)
            .unwrap();

        let subtasks = &response.plan.stages()[0][0].subtasks;
        assert!(!subtasks.is_empty());
        assert!(subtasks.iter().all(|s| !s.starts_with("collect")));
    }
}
