//! GitLab

use blueprint_core::domain::scope::{CicdScope, DomainKind, DomainScope, Repo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ANY, CICD, CODE, CROSS, REPO, REVIEW, TICKET, non_empty};
use crate::catalog::SubtaskMeta;
use crate::chain::{self, ChainRule, GITEXTRACTOR, GitExtractorOptions};
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "gitlab";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GitlabConnection {
    pub token: String,
    pub proxy: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitlabProject {
    pub gitlab_id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
    #[serde(default)]
    pub http_url_to_repo: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub forked_from_project_web_url: String,
    #[serde(default)]
    pub private: bool,
}

impl ToolScope for GitlabProject {
    const TYPE_NAME: &'static str = "GitlabProject";

    fn natural_key(&self) -> String {
        self.gitlab_id.to_string()
    }

    fn display_name(&self) -> &str {
        if self.path_with_namespace.is_empty() {
            &self.name
        } else {
            &self.path_with_namespace
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitlabOptions {
    pub connection_id: u64,
    pub project_id: u64,
    pub full_name: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectApiIssues", TICKET),
    SubtaskMeta::step("extractApiIssues", TICKET),
    SubtaskMeta::collector("collectApiMergeRequests", REVIEW),
    SubtaskMeta::step("extractApiMergeRequests", REVIEW),
    SubtaskMeta::collector("collectApiMrNotes", REVIEW),
    SubtaskMeta::step("extractApiMrNotes", REVIEW),
    SubtaskMeta::collector("collectApiMrCommits", REVIEW),
    SubtaskMeta::step("extractApiMrCommits", REVIEW),
    SubtaskMeta::collector("collectApiCommits", CODE).disabled_by_default(),
    SubtaskMeta::step("extractApiCommits", CODE).disabled_by_default(),
    SubtaskMeta::collector("collectApiPipelines", CICD),
    SubtaskMeta::step("extractApiPipelines", CICD),
    SubtaskMeta::collector("collectApiJobs", CICD),
    SubtaskMeta::step("extractApiJobs", CICD),
    SubtaskMeta::collector("collectAccounts", CROSS),
    SubtaskMeta::step("extractAccounts", CROSS),
    SubtaskMeta::step("enrichMrs", REVIEW),
    SubtaskMeta::step("convertProjects", ANY),
    SubtaskMeta::step("convertIssues", TICKET),
    SubtaskMeta::step("convertMrs", REVIEW),
    SubtaskMeta::step("convertMrComments", REVIEW),
    SubtaskMeta::step("convertApiMrCommits", REVIEW),
    SubtaskMeta::step("convertPipelines", CICD),
    SubtaskMeta::step("convertJobs", CICD),
    SubtaskMeta::step("convertAccounts", CROSS),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[
    DomainMapping::new(DomainKind::Repo, REPO),
    DomainMapping::new(DomainKind::CicdScope, CICD),
    DomainMapping::new(DomainKind::Board, TICKET),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Gitlab;

impl Connector for Gitlab {
    type Connection = GitlabConnection;
    type Scope = GitlabProject;
    type Options = GitlabOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<GitlabOptions, CompileError> {
        Ok(GitlabOptions {
            connection_id: ctx.connection_id,
            project_id: ctx.scope.gitlab_id,
            full_name: ctx.scope.display_name().to_string(),
        })
    }

    fn chain_rules(&self) -> Vec<ChainRule<Self>> {
        vec![
            ChainRule::same_stage(GITEXTRACTOR, can_clone, gitextractor_options),
            chain::refdiff(),
        ]
    }

    fn domain_mappings(&self) -> &'static [DomainMapping] {
        DOMAIN_MAPPINGS
    }

    fn domain_scope(&self, kind: DomainKind, id: &str, project: &GitlabProject) -> Option<DomainScope> {
        let name = project.display_name().to_string();
        let url = non_empty(&project.web_url);
        let scope = match kind {
            DomainKind::Repo => DomainScope::Repo(Repo {
                id: id.to_string(),
                name,
                url,
                forked_from: non_empty(&project.forked_from_project_web_url),
            }),
            DomainKind::CicdScope => DomainScope::CicdScope(CicdScope {
                id: id.to_string(),
                name,
                url,
            }),
            other => DomainScope::new(other, id, name),
        };
        Some(scope)
    }
}

fn can_clone(ctx: &ScopeContext<'_, Gitlab>) -> bool {
    chain::wants_code(ctx)
        && !ctx.scope.http_url_to_repo.is_empty()
        && (!ctx.scope.private || !ctx.connection.token.is_empty())
}

fn gitextractor_options(
    ctx: &ScopeContext<'_, Gitlab>,
) -> Result<Map<String, Value>, CompileError> {
    let url = if ctx.connection.token.is_empty() {
        ctx.scope.http_url_to_repo.clone()
    } else {
        chain::clone_url(
            ctx.scope_id,
            &ctx.scope.http_url_to_repo,
            "git",
            &ctx.connection.token,
        )?
    };
    let options = GitExtractorOptions::new(
        url,
        ctx.scope.display_name(),
        ctx.domain_id,
        &ctx.connection.proxy,
    );
    chain::encode_options(ctx.scope_id, &options)
}
