//! GitHub
//!
//! Repositories collected through the REST plugin, or through the GraphQL
//! plugin when the connection enables it.

use blueprint_core::domain::entity::EntityTag;
use blueprint_core::domain::scope::{CicdScope, DomainKind, DomainScope, Repo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ANY, CICD, CODE, CROSS, REPO, REVIEW, TICKET, non_empty};
use crate::catalog::SubtaskMeta;
use crate::chain::{self, ChainRule, GITEXTRACTOR, GitExtractorOptions};
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "github";
pub const GRAPHQL_PLUGIN: &str = "github_graphql";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubConnection {
    /// Comma separated list of access tokens
    pub token: String,
    pub proxy: String,
    pub enable_graphql: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepo {
    pub github_id: u64,
    pub full_name: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub html_url: String,
    /// Upstream repository when this one is a fork
    #[serde(default)]
    pub parent_html_url: String,
    #[serde(default)]
    pub private: bool,
}

impl ToolScope for GithubRepo {
    const TYPE_NAME: &'static str = "GithubRepo";

    fn natural_key(&self) -> String {
        self.github_id.to_string()
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubOptions {
    pub connection_id: u64,
    pub github_id: u64,
    pub name: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectApiIssues", TICKET),
    SubtaskMeta::step("extractApiIssues", TICKET),
    SubtaskMeta::collector("collectApiPullRequests", REVIEW),
    SubtaskMeta::step("extractApiPullRequests", REVIEW),
    SubtaskMeta::collector("collectApiComments", &[EntityTag::Ticket, EntityTag::CodeReview]),
    SubtaskMeta::step("extractApiComments", &[EntityTag::Ticket, EntityTag::CodeReview]),
    SubtaskMeta::collector("collectApiPullRequestCommits", REVIEW),
    SubtaskMeta::step("extractApiPullRequestCommits", REVIEW),
    SubtaskMeta::collector("collectApiPullRequestReviews", REVIEW),
    SubtaskMeta::step("extractApiPullRequestReviews", REVIEW),
    SubtaskMeta::collector("collectApiCommits", CODE).disabled_by_default(),
    SubtaskMeta::step("extractApiCommits", CODE).disabled_by_default(),
    SubtaskMeta::collector("collectAccounts", CROSS),
    SubtaskMeta::step("extractAccounts", CROSS),
    SubtaskMeta::collector("collectRuns", CICD),
    SubtaskMeta::step("extractRuns", CICD),
    SubtaskMeta::collector("collectJobs", CICD),
    SubtaskMeta::step("extractJobs", CICD),
    SubtaskMeta::step("enrichPullRequestIssues", CROSS),
    SubtaskMeta::step("convertRepo", ANY),
    SubtaskMeta::step("convertIssues", TICKET),
    SubtaskMeta::step("convertPullRequests", REVIEW),
    SubtaskMeta::step("convertPullRequestReviews", REVIEW),
    SubtaskMeta::step("convertRuns", CICD),
    SubtaskMeta::step("convertJobs", CICD),
    SubtaskMeta::step("convertAccounts", CROSS),
];

static GRAPHQL_CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("Collect Issues", TICKET),
    SubtaskMeta::step("Extract Issues", TICKET),
    SubtaskMeta::collector("Collect Pull Requests", REVIEW),
    SubtaskMeta::step("extractPrs", REVIEW),
    SubtaskMeta::collector("Collect Job Runs", CICD),
    SubtaskMeta::step("Extract Jobs", CICD),
    SubtaskMeta::collector("CollectAndExtractDeployment", CICD),
    SubtaskMeta::step("convertRepo", ANY),
    SubtaskMeta::step("convertIssues", TICKET),
    SubtaskMeta::step("convertPullRequests", REVIEW),
    SubtaskMeta::step("convertJobs", CICD),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[
    DomainMapping::new(DomainKind::Repo, REPO),
    DomainMapping::new(DomainKind::CicdScope, CICD),
    DomainMapping::new(DomainKind::Board, TICKET),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Github;

impl Connector for Github {
    type Connection = GithubConnection;
    type Scope = GithubRepo;
    type Options = GithubOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_catalog(&self, connection: &GithubConnection) -> (&'static str, &'static [SubtaskMeta]) {
        if connection.enable_graphql {
            (GRAPHQL_PLUGIN, GRAPHQL_CATALOG)
        } else {
            (PLUGIN, CATALOG)
        }
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<GithubOptions, CompileError> {
        Ok(GithubOptions {
            connection_id: ctx.connection_id,
            github_id: ctx.scope.github_id,
            name: ctx.scope.full_name.clone(),
        })
    }

    fn chain_rules(&self) -> Vec<ChainRule<Self>> {
        vec![
            ChainRule::same_stage(GITEXTRACTOR, can_clone, gitextractor_options),
            chain::refdiff_with_repo_id(),
        ]
    }

    fn domain_mappings(&self) -> &'static [DomainMapping] {
        DOMAIN_MAPPINGS
    }

    fn domain_scope(&self, kind: DomainKind, id: &str, repo: &GithubRepo) -> Option<DomainScope> {
        let url = non_empty(&repo.html_url);
        let scope = match kind {
            DomainKind::Repo => DomainScope::Repo(Repo {
                id: id.to_string(),
                name: repo.full_name.clone(),
                url,
                forked_from: non_empty(&repo.parent_html_url),
            }),
            DomainKind::CicdScope => DomainScope::CicdScope(CicdScope {
                id: id.to_string(),
                name: repo.full_name.clone(),
                url,
            }),
            other => DomainScope::new(other, id, &repo.full_name),
        };
        Some(scope)
    }
}

/// Public repositories always clone; private ones need a token
fn can_clone(ctx: &ScopeContext<'_, Github>) -> bool {
    chain::wants_code(ctx)
        && !ctx.scope.clone_url.is_empty()
        && (!ctx.scope.private || !chain::first_token(&ctx.connection.token).is_empty())
}

fn gitextractor_options(
    ctx: &ScopeContext<'_, Github>,
) -> Result<Map<String, Value>, CompileError> {
    let token = chain::first_token(&ctx.connection.token);
    let url = if token.is_empty() {
        ctx.scope.clone_url.clone()
    } else {
        chain::clone_url(ctx.scope_id, &ctx.scope.clone_url, "git", token)?
    };
    let options = GitExtractorOptions::new(
        url,
        &ctx.scope.full_name,
        ctx.domain_id,
        &ctx.connection.proxy,
    );
    chain::encode_options(ctx.scope_id, &options)
}
