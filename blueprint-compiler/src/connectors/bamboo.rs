//! Bamboo

use blueprint_core::domain::scope::{CicdScope, DomainKind, DomainScope};
use serde::{Deserialize, Serialize};

use super::{CICD, non_empty};
use crate::catalog::SubtaskMeta;
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "bamboo";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BambooConnection {
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BambooPlan {
    pub plan_key: String,
    pub name: String,
    #[serde(default)]
    pub href: String,
}

impl ToolScope for BambooPlan {
    const TYPE_NAME: &'static str = "BambooPlan";

    fn natural_key(&self) -> String {
        self.plan_key.clone()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BambooOptions {
    pub connection_id: u64,
    pub plan_key: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectPlanBuild", CICD),
    SubtaskMeta::step("extractPlanBuild", CICD),
    SubtaskMeta::collector("collectJobBuild", CICD),
    SubtaskMeta::step("extractJobBuild", CICD),
    SubtaskMeta::collector("collectDeployBuild", CICD),
    SubtaskMeta::step("extractDeployBuild", CICD),
    SubtaskMeta::step("convertPlans", CICD),
    SubtaskMeta::step("convertPlanBuilds", CICD),
    SubtaskMeta::step("convertJobBuilds", CICD),
    SubtaskMeta::step("convertDeployBuilds", CICD),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[DomainMapping::new(DomainKind::CicdScope, CICD)];

#[derive(Debug, Clone, Copy, Default)]
pub struct Bamboo;

impl Connector for Bamboo {
    type Connection = BambooConnection;
    type Scope = BambooPlan;
    type Options = BambooOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<BambooOptions, CompileError> {
        Ok(BambooOptions {
            connection_id: ctx.connection_id,
            plan_key: ctx.scope.plan_key.clone(),
        })
    }

    fn domain_mappings(&self) -> &'static [DomainMapping] {
        DOMAIN_MAPPINGS
    }

    fn domain_scope(&self, _kind: DomainKind, id: &str, plan: &BambooPlan) -> Option<DomainScope> {
        Some(DomainScope::CicdScope(CicdScope {
            id: id.to_string(),
            name: plan.name.clone(),
            url: non_empty(&plan.href),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::PlanCompiler;
    use crate::store::MemoryStore;
    use blueprint_core::domain::blueprint::{BlueprintScopeRef, SyncPolicy};
    use blueprint_core::domain::source::{StoredConnection, StoredScope};
    use serde_json::json;

    #[test]
    fn test_plan_key_options() {
        let store = MemoryStore::new()
            .with_connection(StoredConnection {
                id: 1,
                plugin: PLUGIN.to_string(),
                name: "bamboo".to_string(),
                settings: json!({"endpoint": "https://bamboo.example.com/rest/"}),
            })
            .with_scope(
                PLUGIN,
                StoredScope {
                    connection_id: 1,
                    scope_id: "PROJ-PLAN".to_string(),
                    name: "Plan".to_string(),
                    scope_config_id: None,
                    data: json!({"planKey": "PROJ-PLAN", "name": "Plan"}),
                },
            );

        // No entities and no config: only default-enabled subtasks, no domain scopes
        let response = PlanCompiler::new(Bamboo)
            .compile(&store, 1, &[BlueprintScopeRef::new("PROJ-PLAN")], &SyncPolicy::default())
            .unwrap();

        let task = &response.plan.stages()[0][0];
        assert_eq!(task.plugin, "bamboo");
        assert_eq!(task.options["planKey"], "PROJ-PLAN");
        assert_eq!(task.subtasks.len(), CATALOG.len());
        assert!(response.scopes.is_empty());
    }
}
