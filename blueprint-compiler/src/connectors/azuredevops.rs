//! Azure DevOps
//!
//! Repositories hosted in Azure Repos (`TfsGit`) as well as external ones
//! (GitHub, Bitbucket) that only feed pipelines. An empty entity list means
//! every entity, and the repository's visibility and hosting decide which of
//! them can actually be collected.

use blueprint_core::domain::entity::{EntitySet, EntityTag};
use blueprint_core::domain::scope::{CicdScope, DomainKind, DomainScope, Repo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ANY, CICD, REVIEW, TICKET, non_empty};
use crate::catalog::SubtaskMeta;
use crate::chain::{self, ChainRule, GITEXTRACTOR, GitExtractorOptions};
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "azuredevops_go";

/// Repository type of repos hosted by Azure DevOps itself
pub const TFS_GIT: &str = "TfsGit";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzuredevopsConnection {
    /// Personal access token
    pub token: String,
    pub proxy: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzuredevopsRepo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub project_id: String,
    /// Id on the external host for non-Azure repositories
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub remote_url: String,
    #[serde(default, rename = "type")]
    pub repo_type: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_disabled: bool,
}

impl AzuredevopsRepo {
    /// Hosted by Azure Repos. Repositories stored without a type predate
    /// external repository support and are treated as hosted.
    pub fn is_hosted(&self) -> bool {
        self.repo_type.is_empty() || self.repo_type == TFS_GIT
    }

    pub fn is_cloneable(&self) -> bool {
        !self.is_private && !self.is_disabled
    }
}

impl ToolScope for AzuredevopsRepo {
    const TYPE_NAME: &'static str = "AzuredevopsRepo";

    fn natural_key(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzuredevopsOptions {
    pub name: String,
    pub connection_id: u64,
    pub organization_id: String,
    pub project_id: String,
    pub external_id: String,
    pub repository_id: String,
    pub repository_type: String,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectApiPullRequests", REVIEW),
    SubtaskMeta::step("extractApiPullRequests", REVIEW),
    SubtaskMeta::collector("collectApiPullRequestCommits", REVIEW),
    SubtaskMeta::step("extractApiPullRequestCommits", REVIEW),
    SubtaskMeta::collector("collectApiBuilds", CICD),
    SubtaskMeta::step("extractApiBuilds", CICD),
    SubtaskMeta::collector("collectApiTimelineRecords", CICD),
    SubtaskMeta::step("extractApiTimelineRecords", CICD),
    SubtaskMeta::step("convertApiRepository", ANY),
    SubtaskMeta::step("convertApiPullRequests", REVIEW),
    SubtaskMeta::step("convertApiPullRequestCommits", REVIEW),
    SubtaskMeta::step("convertApiBuilds", CICD),
    SubtaskMeta::step("convertApiTimelineRecords", CICD),
    SubtaskMeta::step("convertApiReleaseDeployments", CICD),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[
    DomainMapping::new(DomainKind::Repo, &[EntityTag::Code, EntityTag::CodeReview]),
    DomainMapping::new(DomainKind::CicdScope, CICD),
    DomainMapping::new(DomainKind::Board, TICKET),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AzureDevOps;

impl Connector for AzureDevOps {
    type Connection = AzuredevopsConnection;
    type Scope = AzuredevopsRepo;
    type Options = AzuredevopsOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn effective_entities(&self, _repo: &AzuredevopsRepo, requested: EntitySet) -> EntitySet {
        if requested.is_empty() {
            EntitySet::all()
        } else {
            requested
        }
    }

    fn blocked_entities(&self, repo: &AzuredevopsRepo) -> EntitySet {
        let mut blocked = EntitySet::new();
        if !repo.is_cloneable() {
            blocked.insert(EntityTag::Code);
            blocked.insert(EntityTag::CodeReview);
        }
        if !repo.is_hosted() {
            blocked.insert(EntityTag::CodeReview);
        }
        blocked
    }

    fn task_options(
        &self,
        ctx: &ScopeContext<'_, Self>,
    ) -> Result<AzuredevopsOptions, CompileError> {
        let repo = ctx.scope;
        let repository_type = if repo.repo_type.is_empty() {
            tracing::warn!(
                scope_id = ctx.scope_id,
                "Repository has no type, assuming {}",
                TFS_GIT
            );
            TFS_GIT.to_string()
        } else {
            repo.repo_type.clone()
        };

        Ok(AzuredevopsOptions {
            name: repo.name.clone(),
            connection_id: ctx.connection_id,
            organization_id: repo.organization_id.clone(),
            project_id: repo.project_id.clone(),
            external_id: repo.external_id.clone(),
            repository_id: repo.id.clone(),
            repository_type,
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

    fn domain_scope(&self, kind: DomainKind, id: &str, repo: &AzuredevopsRepo) -> Option<DomainScope> {
        let url = non_empty(&repo.url).or_else(|| non_empty(&repo.remote_url));
        match kind {
            DomainKind::Repo if !repo.is_cloneable() => None,
            DomainKind::Repo => Some(DomainScope::Repo(Repo {
                id: id.to_string(),
                name: repo.name.clone(),
                url,
                forked_from: None,
            })),
            DomainKind::CicdScope => Some(DomainScope::CicdScope(CicdScope {
                id: id.to_string(),
                name: repo.name.clone(),
                url,
            })),
            other => Some(DomainScope::new(other, id, &repo.name)),
        }
    }
}

fn can_clone(ctx: &ScopeContext<'_, AzureDevOps>) -> bool {
    ctx.scope.is_cloneable() && chain::wants_code(ctx) && !ctx.scope.remote_url.is_empty()
}

fn gitextractor_options(
    ctx: &ScopeContext<'_, AzureDevOps>,
) -> Result<Map<String, Value>, CompileError> {
    let repo = ctx.scope;
    // The PAT is only valid for Azure-hosted remotes
    let url = if repo.is_hosted() && !ctx.connection.token.is_empty() {
        chain::clone_url(ctx.scope_id, &repo.remote_url, "git", &ctx.connection.token)?
    } else {
        repo.remote_url.clone()
    };
    let options = GitExtractorOptions::new(url, &repo.name, ctx.domain_id, &ctx.connection.proxy)
        .no_shallow_clone();
    chain::encode_options(ctx.scope_id, &options)
}
