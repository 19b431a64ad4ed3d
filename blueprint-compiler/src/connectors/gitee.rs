//! Gitee

use blueprint_core::domain::scope::{DomainKind, DomainScope, Repo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ANY, CODE, CROSS, REPO, REVIEW, TICKET, non_empty};
use crate::catalog::SubtaskMeta;
use crate::chain::{self, ChainRule, GITEXTRACTOR, GitExtractorOptions};
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "gitee";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiteeConnection {
    /// Comma separated list of access tokens
    pub token: String,
    pub proxy: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiteeRepo {
    pub gitee_id: u64,
    /// `owner/repo`
    pub name: String,
    #[serde(default)]
    pub http_url: String,
}

impl GiteeRepo {
    fn owner_and_repo(&self) -> (&str, &str) {
        self.name.split_once('/').unwrap_or(("", self.name.as_str()))
    }
}

impl ToolScope for GiteeRepo {
    const TYPE_NAME: &'static str = "GiteeRepo";

    fn natural_key(&self) -> String {
        self.gitee_id.to_string()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiteeOptions {
    pub connection_id: u64,
    pub owner: String,
    pub repo: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectApiRepo", ANY).required(),
    SubtaskMeta::step("extractApiRepo", ANY).required(),
    SubtaskMeta::collector("collectApiIssues", TICKET),
    SubtaskMeta::step("extractApiIssues", TICKET),
    SubtaskMeta::collector("collectApiPullRequests", REVIEW),
    SubtaskMeta::step("extractApiPullRequests", REVIEW),
    SubtaskMeta::collector("collectApiComments", TICKET),
    SubtaskMeta::step("extractApiComments", TICKET),
    SubtaskMeta::collector("collectApiPullRequestCommits", REVIEW),
    SubtaskMeta::step("extractApiPullRequestCommits", REVIEW),
    SubtaskMeta::collector("collectApiPullRequestReviews", REVIEW),
    SubtaskMeta::step("extractApiPullRequestReviews", REVIEW),
    SubtaskMeta::collector("collectApiCommits", CODE).disabled_by_default(),
    SubtaskMeta::step("extractApiCommits", CODE).disabled_by_default(),
    SubtaskMeta::step("enrichPullRequestIssues", CROSS),
    SubtaskMeta::step("convertRepo", ANY),
    SubtaskMeta::step("convertIssues", TICKET),
    SubtaskMeta::step("convertIssueComments", TICKET),
    SubtaskMeta::step("convertPullRequests", REVIEW),
    SubtaskMeta::step("convertPullRequestCommits", REVIEW),
    SubtaskMeta::step("convertPullRequestIssues", CROSS),
    SubtaskMeta::step("convertAccounts", CROSS),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[
    DomainMapping::new(DomainKind::Repo, REPO),
    DomainMapping::new(DomainKind::Board, TICKET),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Gitee;

impl Connector for Gitee {
    type Connection = GiteeConnection;
    type Scope = GiteeRepo;
    type Options = GiteeOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<GiteeOptions, CompileError> {
        let (owner, repo) = ctx.scope.owner_and_repo();
        Ok(GiteeOptions {
            connection_id: ctx.connection_id,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn chain_rules(&self) -> Vec<ChainRule<Self>> {
        vec![
            ChainRule::same_stage(GITEXTRACTOR, can_clone, gitextractor_options),
            chain::refdiff(),
            chain::dora(),
        ]
    }

    fn domain_mappings(&self) -> &'static [DomainMapping] {
        DOMAIN_MAPPINGS
    }

    fn domain_scope(&self, kind: DomainKind, id: &str, repo: &GiteeRepo) -> Option<DomainScope> {
        let scope = match kind {
            DomainKind::Repo => DomainScope::Repo(Repo {
                id: id.to_string(),
                name: repo.name.clone(),
                url: non_empty(&repo.http_url),
                forked_from: None,
            }),
            other => DomainScope::new(other, id, &repo.name),
        };
        Some(scope)
    }
}

fn can_clone(ctx: &ScopeContext<'_, Gitee>) -> bool {
    chain::wants_code(ctx) && !ctx.scope.http_url.is_empty()
}

fn gitextractor_options(
    ctx: &ScopeContext<'_, Gitee>,
) -> Result<Map<String, Value>, CompileError> {
    let token = chain::first_token(&ctx.connection.token);
    let url = if token.is_empty() {
        ctx.scope.http_url.clone()
    } else {
        chain::clone_url(ctx.scope_id, &ctx.scope.http_url, "git", token)?
    };
    let options = GitExtractorOptions::new(url, &ctx.scope.name, ctx.domain_id, &ctx.connection.proxy);
    chain::encode_options(ctx.scope_id, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::PlanCompiler;
    use crate::store::MemoryStore;
    use blueprint_core::domain::blueprint::{BlueprintScopeRef, SyncPolicy};
    use blueprint_core::domain::entity::EntityTag;
    use blueprint_core::domain::source::{ScopeConfig, StoredConnection, StoredScope};
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_connection(StoredConnection {
                id: 5,
                plugin: PLUGIN.to_string(),
                name: "gitee".to_string(),
                settings: json!({"token": "a,b"}),
            })
            .with_scope(
                PLUGIN,
                StoredScope {
                    connection_id: 5,
                    scope_id: "7".to_string(),
                    name: "team/app".to_string(),
                    scope_config_id: Some(2),
                    data: json!({
                        "giteeId": 7,
                        "name": "team/app",
                        "httpUrl": "https://gitee.com/team/app"
                    }),
                },
            )
            .with_scope_config(
                PLUGIN,
                ScopeConfig {
                    id: 2,
                    entities: [EntityTag::Code, EntityTag::Ticket].into(),
                    production_pattern: Some("prod".to_string()),
                    ..Default::default()
                },
            )
    }

    #[test]
    fn test_owner_and_repo_options() {
        let response = PlanCompiler::new(Gitee)
            .compile(&store(), 5, &[BlueprintScopeRef::new("7")], &SyncPolicy::default())
            .unwrap();

        let primary = &response.plan.stages()[0][0];
        assert_eq!(primary.options["owner"], "team");
        assert_eq!(primary.options["repo"], "app");
        assert!(primary.subtasks.contains(&"collectApiRepo".to_string()));
        assert!(primary.subtasks.contains(&"collectApiIssues".to_string()));
    }

    #[test]
    fn test_dora_follows_production_pattern() {
        let response = PlanCompiler::new(Gitee)
            .compile(&store(), 5, &[BlueprintScopeRef::new("7")], &SyncPolicy::default())
            .unwrap();

        let stages = response.plan.stages();
        assert_eq!(stages.len(), 2);
        let dora = &stages[1][0];
        assert_eq!(dora.plugin, "dora");
        assert_eq!(dora.options["repoId"], "gitee:GiteeRepo:5:7");
        assert_eq!(dora.options["transformationRules"]["productionPattern"], "prod");

        let kinds: Vec<_> = response.scopes.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![DomainKind::Repo, DomainKind::Board]);
    }
}
