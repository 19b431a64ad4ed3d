//! Jenkins

use blueprint_core::domain::scope::{CicdScope, DomainKind, DomainScope};
use serde::{Deserialize, Serialize};

use super::{CICD, non_empty};
use crate::catalog::SubtaskMeta;
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "jenkins";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JenkinsConnection {
    pub endpoint: String,
    pub username: String,
}

/// A job, addressed by its folder path
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsJob {
    pub full_name: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl ToolScope for JenkinsJob {
    const TYPE_NAME: &'static str = "JenkinsJob";

    fn natural_key(&self) -> String {
        self.full_name.clone()
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsOptions {
    pub connection_id: u64,
    pub full_name: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectApiBuilds", CICD),
    SubtaskMeta::step("extractApiBuilds", CICD),
    SubtaskMeta::collector("collectApiStages", CICD),
    SubtaskMeta::step("extractApiStages", CICD),
    SubtaskMeta::step("enrichApiBuilds", CICD),
    SubtaskMeta::step("convertJobs", CICD),
    SubtaskMeta::step("convertBuildsToCicdTasks", CICD),
    SubtaskMeta::step("convertStages", CICD),
    SubtaskMeta::step("convertBuildRepos", CICD),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[DomainMapping::new(DomainKind::CicdScope, CICD)];

#[derive(Debug, Clone, Copy, Default)]
pub struct Jenkins;

impl Connector for Jenkins {
    type Connection = JenkinsConnection;
    type Scope = JenkinsJob;
    type Options = JenkinsOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<JenkinsOptions, CompileError> {
        Ok(JenkinsOptions {
            connection_id: ctx.connection_id,
            full_name: ctx.scope.full_name.clone(),
        })
    }

    fn domain_mappings(&self) -> &'static [DomainMapping] {
        DOMAIN_MAPPINGS
    }

    fn domain_scope(&self, _kind: DomainKind, id: &str, job: &JenkinsJob) -> Option<DomainScope> {
        Some(DomainScope::CicdScope(CicdScope {
            id: id.to_string(),
            name: job.full_name.clone(),
            url: non_empty(&job.url),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::PlanCompiler;
    use crate::store::MemoryStore;
    use blueprint_core::domain::blueprint::{BlueprintScopeRef, SyncPolicy};
    use blueprint_core::domain::entity::EntityTag;
    use blueprint_core::domain::source::{StoredConnection, StoredScope};
    use serde_json::json;

    #[test]
    fn test_job_in_folder() {
        let store = MemoryStore::new()
            .with_connection(StoredConnection {
                id: 8,
                plugin: PLUGIN.to_string(),
                name: "ci".to_string(),
                settings: serde_json::Value::Null,
            })
            .with_scope(
                PLUGIN,
                StoredScope {
                    connection_id: 8,
                    scope_id: "team/build".to_string(),
                    name: "build".to_string(),
                    scope_config_id: None,
                    data: json!({
                        "fullName": "team/build",
                        "name": "build",
                        "url": "https://ci.example.com/job/team/job/build/"
                    }),
                },
            );
        let scope_ref = BlueprintScopeRef::new("team/build").with_entities([EntityTag::Cicd]);
        let response = PlanCompiler::new(Jenkins)
            .compile(&store, 8, &[scope_ref], &SyncPolicy::default())
            .unwrap();

        let task = &response.plan.stages()[0][0];
        assert_eq!(task.options["fullName"], "team/build");
        assert_eq!(task.subtasks.len(), CATALOG.len());

        match &response.scopes[0] {
            DomainScope::CicdScope(scope) => {
                assert_eq!(scope.id, "jenkins:JenkinsJob:8:team/build");
                assert_eq!(
                    scope.url.as_deref(),
                    Some("https://ci.example.com/job/team/job/build/")
                );
            }
            other => panic!("expected cicd scope, got {:?}", other),
        }
    }
}
