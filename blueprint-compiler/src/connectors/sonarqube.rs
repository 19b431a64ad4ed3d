//! SonarQube

use blueprint_core::domain::scope::{DomainKind, DomainScope};
use serde::{Deserialize, Serialize};

use super::CODE_QUALITY;
use crate::catalog::SubtaskMeta;
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "sonarqube";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SonarqubeConnection {
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarqubeProject {
    pub project_key: String,
    pub name: String,
}

impl ToolScope for SonarqubeProject {
    const TYPE_NAME: &'static str = "SonarqubeProject";

    fn natural_key(&self) -> String {
        self.project_key.clone()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarqubeOptions {
    pub connection_id: u64,
    pub project_key: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("CollectAdditionalFilemetrics", CODE_QUALITY),
    SubtaskMeta::step("ExtractAdditionalFileMetrics", CODE_QUALITY),
    SubtaskMeta::collector("CollectIssues", CODE_QUALITY),
    SubtaskMeta::step("ExtractIssues", CODE_QUALITY),
    SubtaskMeta::collector("CollectHotspots", CODE_QUALITY),
    SubtaskMeta::step("ExtractHotspots", CODE_QUALITY),
    SubtaskMeta::collector("CollectFilemetrics", CODE_QUALITY),
    SubtaskMeta::step("ExtractFilemetrics", CODE_QUALITY),
    SubtaskMeta::collector("CollectAccounts", CODE_QUALITY),
    SubtaskMeta::step("ExtractAccounts", CODE_QUALITY),
    SubtaskMeta::step("ConvertProjects", CODE_QUALITY),
    SubtaskMeta::step("ConvertIssues", CODE_QUALITY),
    SubtaskMeta::step("ConvertIssueCodeBlocks", CODE_QUALITY),
    SubtaskMeta::step("ConvertHotspots", CODE_QUALITY),
    SubtaskMeta::step("ConvertFileMetrics", CODE_QUALITY),
    SubtaskMeta::step("ConvertAccounts", CODE_QUALITY),
];

static DOMAIN_MAPPINGS: &[DomainMapping] =
    &[DomainMapping::new(DomainKind::CqProject, CODE_QUALITY)];

#[derive(Debug, Clone, Copy, Default)]
pub struct Sonarqube;

impl Connector for Sonarqube {
    type Connection = SonarqubeConnection;
    type Scope = SonarqubeProject;
    type Options = SonarqubeOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<SonarqubeOptions, CompileError> {
        Ok(SonarqubeOptions {
            connection_id: ctx.connection_id,
            project_key: ctx.scope.project_key.clone(),
        })
    }

    fn domain_mappings(&self) -> &'static [DomainMapping] {
        DOMAIN_MAPPINGS
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
    fn test_cq_project_scope() {
        let store = MemoryStore::new()
            .with_connection(StoredConnection {
                id: 1,
                plugin: PLUGIN.to_string(),
                name: "sonar".to_string(),
                settings: json!({}),
            })
            .with_scope(
                PLUGIN,
                StoredScope {
                    connection_id: 1,
                    scope_id: "app:main".to_string(),
                    name: "app".to_string(),
                    scope_config_id: None,
                    data: json!({"projectKey": "app:main", "name": "app"}),
                },
            );
        let scope_ref = BlueprintScopeRef::new("app:main").with_entities([EntityTag::CodeQuality]);
        let response = PlanCompiler::new(Sonarqube)
            .compile(&store, 1, &[scope_ref], &SyncPolicy::default())
            .unwrap();

        assert_eq!(response.plan.stages()[0][0].options["projectKey"], "app:main");
        assert_eq!(response.scopes.len(), 1);
        assert_eq!(response.scopes[0].kind(), DomainKind::CqProject);
        // The key itself may contain the delimiter; it always comes last
        assert_eq!(response.scopes[0].id(), "sonarqube:SonarqubeProject:1:app:main");
    }
}
