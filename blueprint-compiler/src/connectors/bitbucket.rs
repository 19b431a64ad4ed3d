//! Bitbucket Cloud

use blueprint_core::domain::scope::{CicdScope, DomainKind, DomainScope, Repo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ANY, CICD, CROSS, REPO, REVIEW, TICKET, non_empty};
use crate::catalog::SubtaskMeta;
use crate::chain::{self, ChainRule, GITEXTRACTOR, GitExtractorOptions};
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "bitbucket";

/// Username Bitbucket expects when cloning with an API token
pub const API_TOKEN_USER: &str = "x-bitbucket-api-token-auth";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BitbucketConnection {
    pub username: String,
    /// App password, or API token when `usesApiToken` is set
    pub password: String,
    pub uses_api_token: bool,
    pub proxy: String,
}

impl BitbucketConnection {
    fn clone_user(&self) -> &str {
        if self.uses_api_token {
            API_TOKEN_USER
        } else {
            &self.username
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitbucketRepo {
    /// Full name, `workspace/repo`
    pub bitbucket_id: String,
    pub name: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub is_private: bool,
}

impl ToolScope for BitbucketRepo {
    const TYPE_NAME: &'static str = "BitbucketRepo";

    fn natural_key(&self) -> String {
        self.bitbucket_id.clone()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BitbucketOptions {
    pub connection_id: u64,
    pub full_name: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectApiPullRequests", REVIEW),
    SubtaskMeta::step("extractApiPullRequests", REVIEW),
    SubtaskMeta::collector("collectApiPrComments", REVIEW),
    SubtaskMeta::step("extractApiPrComments", REVIEW),
    SubtaskMeta::collector("collectApiPrCommits", REVIEW),
    SubtaskMeta::step("extractApiPrCommits", REVIEW),
    SubtaskMeta::collector("collectApiIssues", TICKET),
    SubtaskMeta::step("extractApiIssues", TICKET),
    SubtaskMeta::collector("collectApiIssueComments", TICKET),
    SubtaskMeta::step("extractApiIssueComments", TICKET),
    SubtaskMeta::collector("collectApiPipelines", CICD),
    SubtaskMeta::step("extractApiPipelines", CICD),
    SubtaskMeta::collector("collectPipelineSteps", CICD),
    SubtaskMeta::step("extractPipelineSteps", CICD),
    SubtaskMeta::collector("collectApiDeployments", CICD),
    SubtaskMeta::step("extractApiDeployments", CICD),
    SubtaskMeta::step("convertRepo", ANY),
    SubtaskMeta::step("convertAccounts", CROSS),
    SubtaskMeta::step("convertPullRequests", REVIEW),
    SubtaskMeta::step("convertPrComments", REVIEW),
    SubtaskMeta::step("convertPrCommits", REVIEW),
    SubtaskMeta::step("convertIssues", TICKET),
    SubtaskMeta::step("convertIssueComments", TICKET),
    SubtaskMeta::step("convertPipelines", CICD),
    SubtaskMeta::step("convertPipelineSteps", CICD),
    SubtaskMeta::step("convertDeployments", CICD),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[
    DomainMapping::new(DomainKind::Repo, REPO),
    DomainMapping::new(DomainKind::CicdScope, CICD),
    DomainMapping::new(DomainKind::Board, TICKET),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Bitbucket;

impl Connector for Bitbucket {
    type Connection = BitbucketConnection;
    type Scope = BitbucketRepo;
    type Options = BitbucketOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<BitbucketOptions, CompileError> {
        Ok(BitbucketOptions {
            connection_id: ctx.connection_id,
            full_name: ctx.scope.bitbucket_id.clone(),
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

    fn domain_scope(&self, kind: DomainKind, id: &str, repo: &BitbucketRepo) -> Option<DomainScope> {
        let url = non_empty(&repo.html_url);
        let scope = match kind {
            DomainKind::Repo => DomainScope::Repo(Repo {
                id: id.to_string(),
                name: repo.bitbucket_id.clone(),
                url,
                forked_from: None,
            }),
            DomainKind::CicdScope => DomainScope::CicdScope(CicdScope {
                id: id.to_string(),
                name: repo.bitbucket_id.clone(),
                url,
            }),
            other => DomainScope::new(other, id, &repo.bitbucket_id),
        };
        Some(scope)
    }
}

fn can_clone(ctx: &ScopeContext<'_, Bitbucket>) -> bool {
    chain::wants_code(ctx)
        && !ctx.scope.clone_url.is_empty()
        && (!ctx.scope.is_private || !ctx.connection.password.is_empty())
}

fn gitextractor_options(
    ctx: &ScopeContext<'_, Bitbucket>,
) -> Result<Map<String, Value>, CompileError> {
    let connection = ctx.connection;
    let url = if connection.password.is_empty() {
        ctx.scope.clone_url.clone()
    } else {
        chain::clone_url(
            ctx.scope_id,
            &ctx.scope.clone_url,
            connection.clone_user(),
            &connection.password,
        )?
    };
    let options = GitExtractorOptions::new(url, &ctx.scope.name, ctx.domain_id, &connection.proxy)
        .with_full_name(&ctx.scope.bitbucket_id);
    chain::encode_options(ctx.scope_id, &options)
}
