//! Chained tasks
//!
//! A chain rule appends a task after a scope's primary task, either next to
//! it in the same stage or in a stage of its own that runs after every
//! primary stage. Connectors pick the rules they need and supply the gate
//! and option builder; the rules shared by the git-based connectors live here.

use blueprint_core::domain::entity::EntityTag;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::connector::{Connector, ScopeContext};
use crate::error::CompileError;

/// Where a chained task lands relative to the primary task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Runs concurrently with the primary task
    SameStage,
    /// Needs the output of earlier stages; gets its own stage
    NewStage,
}

pub type Gate<C> = fn(&ScopeContext<'_, C>) -> bool;
pub type OptionBuilder<C> = fn(&ScopeContext<'_, C>) -> Result<Map<String, Value>, CompileError>;

/// A task appended after a scope's primary task when its gate passes
pub struct ChainRule<C: Connector> {
    pub plugin: &'static str,
    pub placement: Placement,
    pub subtasks: &'static [&'static str],
    pub applies: Gate<C>,
    pub options: OptionBuilder<C>,
}

impl<C: Connector> ChainRule<C> {
    pub fn same_stage(plugin: &'static str, applies: Gate<C>, options: OptionBuilder<C>) -> Self {
        Self {
            plugin,
            placement: Placement::SameStage,
            subtasks: &[],
            applies,
            options,
        }
    }

    pub fn new_stage(plugin: &'static str, applies: Gate<C>, options: OptionBuilder<C>) -> Self {
        Self {
            plugin,
            placement: Placement::NewStage,
            subtasks: &[],
            applies,
            options,
        }
    }

    pub fn with_subtasks(mut self, subtasks: &'static [&'static str]) -> Self {
        self.subtasks = subtasks;
        self
    }
}

// =============================================================================
// Shared rules
// =============================================================================

pub const GITEXTRACTOR: &str = "gitextractor";
pub const REFDIFF: &str = "refdiff";
pub const DORA: &str = "dora";

/// Tag-range diffing, run after extraction when the scope config has a
/// refdiff block. Options are the block itself.
pub fn refdiff<C: Connector>() -> ChainRule<C> {
    ChainRule::new_stage(REFDIFF, has_refdiff::<C>, refdiff_options::<C>)
}

/// Same as [`refdiff`], with the scope's domain id injected as `repoId`
pub fn refdiff_with_repo_id<C: Connector>() -> ChainRule<C> {
    ChainRule::new_stage(REFDIFF, has_refdiff::<C>, refdiff_options_with_repo_id::<C>)
}

/// Deployment environment enrichment, run when a production pattern is set
pub fn dora<C: Connector>() -> ChainRule<C> {
    ChainRule::new_stage(DORA, has_production_pattern::<C>, dora_options::<C>)
        .with_subtasks(&["EnrichTaskEnv"])
}

pub fn wants_code<C: Connector>(ctx: &ScopeContext<'_, C>) -> bool {
    ctx.wants(EntityTag::Code)
}

fn has_refdiff<C: Connector>(ctx: &ScopeContext<'_, C>) -> bool {
    ctx.refdiff().is_some()
}

fn has_production_pattern<C: Connector>(ctx: &ScopeContext<'_, C>) -> bool {
    ctx.production_pattern().is_some()
}

fn refdiff_options<C: Connector>(
    ctx: &ScopeContext<'_, C>,
) -> Result<Map<String, Value>, CompileError> {
    Ok(ctx.refdiff().cloned().unwrap_or_default())
}

fn refdiff_options_with_repo_id<C: Connector>(
    ctx: &ScopeContext<'_, C>,
) -> Result<Map<String, Value>, CompileError> {
    let mut options = refdiff_options(ctx)?;
    options.insert("repoId".to_string(), Value::from(ctx.domain_id));
    Ok(options)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DoraOptions<'a> {
    repo_id: &'a str,
    transformation_rules: DoraRules<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DoraRules<'a> {
    production_pattern: &'a str,
}

fn dora_options<C: Connector>(
    ctx: &ScopeContext<'_, C>,
) -> Result<Map<String, Value>, CompileError> {
    let pattern = ctx.production_pattern().unwrap_or_default();
    validate_pattern(ctx.scope_id, "productionPattern", pattern)?;
    encode_options(
        ctx.scope_id,
        &DoraOptions {
            repo_id: ctx.domain_id,
            transformation_rules: DoraRules {
                production_pattern: pattern,
            },
        },
    )
}

// =============================================================================
// Helpers
// =============================================================================

/// Options of a source-extraction task
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitExtractorOptions {
    pub url: String,
    pub name: String,
    pub repo_id: String,
    pub proxy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub no_shallow_clone: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl GitExtractorOptions {
    pub fn new(url: String, name: &str, repo_id: &str, proxy: &str) -> Self {
        Self {
            url,
            name: name.to_string(),
            repo_id: repo_id.to_string(),
            proxy: proxy.to_string(),
            full_name: None,
            no_shallow_clone: false,
        }
    }

    pub fn with_full_name(mut self, full_name: &str) -> Self {
        self.full_name = Some(full_name.to_string());
        self
    }

    pub fn no_shallow_clone(mut self) -> Self {
        self.no_shallow_clone = true;
        self
    }
}

#[derive(Debug, Error)]
pub enum CloneUrlError {
    #[error("invalid clone url '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("clone url '{0}' cannot carry credentials")]
    NoAuthority(String),
}

/// Embed `username:password` into a clone URL
pub fn with_credentials(raw: &str, username: &str, password: &str) -> Result<String, CloneUrlError> {
    let mut url = Url::parse(raw).map_err(|source| CloneUrlError::Parse {
        url: raw.to_string(),
        source,
    })?;
    url.set_username(username)
        .map_err(|_| CloneUrlError::NoAuthority(raw.to_string()))?;
    url.set_password(Some(password))
        .map_err(|_| CloneUrlError::NoAuthority(raw.to_string()))?;
    Ok(url.to_string())
}

/// [`with_credentials`] with the failure reported against a scope
pub fn clone_url(
    scope_id: &str,
    raw: &str,
    username: &str,
    password: &str,
) -> Result<String, CompileError> {
    with_credentials(raw, username, password)
        .map_err(|e| CompileError::bad_input(scope_id, e.to_string()))
}

/// First entry of a comma separated token list
pub fn first_token(tokens: &str) -> &str {
    tokens.split(',').next().unwrap_or_default().trim()
}

/// Serialize typed options into a task's flat option map
pub fn encode_options<T: Serialize>(
    scope_id: &str,
    options: &T,
) -> Result<Map<String, Value>, CompileError> {
    match serde_json::to_value(options) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CompileError::internal(
            scope_id,
            format!("task options must encode to an object, got {}", other),
        )),
        Err(e) => Err(CompileError::internal(
            scope_id,
            format!("failed to encode task options: {}", e),
        )),
    }
}

fn validate_pattern(scope_id: &str, field: &str, pattern: &str) -> Result<(), CompileError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| CompileError::bad_input(scope_id, format!("invalid {}: {}", field, e)))
}
