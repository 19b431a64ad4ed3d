//! Blueprint planner
//!
//! Compiles every connection of a blueprint and merges the results: plans
//! of different connections run side by side, wrapped by the blueprint's
//! own before/after plans.

use blueprint_core::domain::blueprint::BlueprintSettings;
use blueprint_core::domain::pipeline::PipelinePlan;
use blueprint_core::dto::compile::CompileResponse;

use crate::error::CompileError;
use crate::registry::ConnectorRegistry;
use crate::store::ScopeStore;

pub struct BlueprintPlanner<'r> {
    registry: &'r ConnectorRegistry,
}

impl<'r> BlueprintPlanner<'r> {
    pub fn new(registry: &'r ConnectorRegistry) -> Self {
        Self { registry }
    }

    pub fn plan(
        &self,
        store: &dyn ScopeStore,
        settings: &BlueprintSettings,
    ) -> Result<CompileResponse, CompileError> {
        let mut plans = Vec::with_capacity(settings.connections.len());
        let mut scopes = Vec::new();

        for connection in &settings.connections {
            let source = self.registry.get(&connection.plugin)?;
            let mut response = source.compile(
                store,
                connection.connection_id,
                &connection.scopes,
                &settings.sync_policy,
            )?;

            if connection.skip_on_fail {
                for task in response.plan.tasks_mut() {
                    task.skip_on_fail = true;
                }
            }

            plans.push(response.plan);
            scopes.extend(response.scopes);
        }

        let plan = PipelinePlan::sequentialize([
            settings.before_plan.clone(),
            PipelinePlan::parallelize(plans),
            settings.after_plan.clone(),
        ]);

        tracing::info!(
            connections = settings.connections.len(),
            stages = plan.len(),
            scopes = scopes.len(),
            "Blueprint planned"
        );

        Ok(CompileResponse { plan, scopes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use blueprint_core::domain::blueprint::{BlueprintConnection, BlueprintScopeRef};
    use blueprint_core::domain::entity::EntityTag;
    use blueprint_core::domain::pipeline::PipelineTask;
    use blueprint_core::domain::source::{StoredConnection, StoredScope};
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_connection(StoredConnection {
                id: 1,
                plugin: "jira".to_string(),
                name: "jira".to_string(),
                settings: json!({}),
            })
            .with_scope(
                "jira",
                StoredScope {
                    connection_id: 1,
                    scope_id: "10".to_string(),
                    name: "Board".to_string(),
                    scope_config_id: None,
                    data: json!({"boardId": 10, "name": "Board"}),
                },
            )
            .with_connection(StoredConnection {
                id: 2,
                plugin: "jenkins".to_string(),
                name: "ci".to_string(),
                settings: json!({}),
            })
            .with_scope(
                "jenkins",
                StoredScope {
                    connection_id: 2,
                    scope_id: "deploy".to_string(),
                    name: "deploy".to_string(),
                    scope_config_id: None,
                    data: json!({"fullName": "deploy", "name": "deploy"}),
                },
            )
    }

    fn settings() -> BlueprintSettings {
        BlueprintSettings {
            connections: vec![
                BlueprintConnection {
                    plugin: "jira".to_string(),
                    connection_id: 1,
                    skip_on_fail: true,
                    scopes: vec![BlueprintScopeRef::new("10").with_entities([EntityTag::Ticket])],
                },
                BlueprintConnection {
                    plugin: "jenkins".to_string(),
                    connection_id: 2,
                    skip_on_fail: false,
                    scopes: vec![BlueprintScopeRef::new("deploy").with_entities([EntityTag::Cicd])],
                },
            ],
            before_plan: PipelinePlan::from_stages(vec![vec![PipelineTask::new("webhook")]]),
            after_plan: PipelinePlan::from_stages(vec![vec![PipelineTask::new("dora")]]),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_merges_connections() {
        let registry = ConnectorRegistry::with_defaults();
        let response = BlueprintPlanner::new(&registry)
            .plan(&store(), &settings())
            .unwrap();

        let stages = response.plan.stages();
        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0][0].plugin, "webhook");

        let middle: Vec<_> = stages[1].iter().map(|t| t.plugin.as_str()).collect();
        assert_eq!(middle, vec!["jira", "jenkins"]);
        assert!(stages[1][0].skip_on_fail);
        assert!(!stages[1][1].skip_on_fail);

        assert_eq!(stages[2][0].plugin, "dora");
        assert_eq!(response.scopes.len(), 2);
    }

    #[test]
    fn test_plan_fails_on_unknown_plugin() {
        let registry = ConnectorRegistry::with_defaults();
        let mut settings = settings();
        settings.connections[1].plugin = "tapd".to_string();

        let err = BlueprintPlanner::new(&registry)
            .plan(&store(), &settings)
            .err()
            .unwrap();
        assert!(err.is_not_found());
    }
}
