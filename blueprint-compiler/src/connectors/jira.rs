//! Jira

use blueprint_core::domain::scope::{Board, DomainKind, DomainScope};
use serde::{Deserialize, Serialize};

use super::{BOARD, CROSS, TICKET};
use crate::catalog::SubtaskMeta;
use crate::connector::{Connector, DomainMapping, ScopeContext, ToolScope};
use crate::error::CompileError;

pub const PLUGIN: &str = "jira";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JiraConnection {
    /// REST endpoint, e.g. `https://example.atlassian.net/rest/`
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraBoard {
    pub board_id: u64,
    pub name: String,
}

impl ToolScope for JiraBoard {
    const TYPE_NAME: &'static str = "JiraBoard";

    fn natural_key(&self) -> String {
        self.board_id.to_string()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraOptions {
    pub connection_id: u64,
    pub board_id: u64,
}

static CATALOG: &[SubtaskMeta] = &[
    SubtaskMeta::collector("collectStatus", TICKET).required(),
    SubtaskMeta::step("extractStatus", TICKET).required(),
    SubtaskMeta::collector("collectIssueTypes", TICKET),
    SubtaskMeta::step("extractIssueType", TICKET),
    SubtaskMeta::collector("collectIssues", TICKET),
    SubtaskMeta::step("extractIssues", TICKET),
    SubtaskMeta::collector("collectIssueChangelogs", TICKET),
    SubtaskMeta::step("extractIssueChangelogs", TICKET),
    SubtaskMeta::collector("collectWorklogs", TICKET),
    SubtaskMeta::step("extractWorklogs", TICKET),
    SubtaskMeta::collector("collectIssueComments", TICKET),
    SubtaskMeta::step("extractIssueComments", TICKET),
    SubtaskMeta::collector("collectSprints", TICKET),
    SubtaskMeta::step("extractSprints", TICKET),
    SubtaskMeta::collector("collectAccounts", CROSS),
    SubtaskMeta::step("extractAccounts", CROSS),
    SubtaskMeta::collector("collectRemotelinks", CROSS),
    SubtaskMeta::step("extractRemotelinks", CROSS),
    SubtaskMeta::step("convertBoard", BOARD),
    SubtaskMeta::step("convertIssues", TICKET),
    SubtaskMeta::step("convertIssueChangelogs", TICKET),
    SubtaskMeta::step("convertWorklogs", TICKET),
    SubtaskMeta::step("convertIssueComments", TICKET),
    SubtaskMeta::step("convertSprints", TICKET),
    SubtaskMeta::step("convertIssueCommits", CROSS),
    SubtaskMeta::step("convertIssueRepoCommits", CROSS),
    SubtaskMeta::step("convertAccounts", CROSS),
];

static DOMAIN_MAPPINGS: &[DomainMapping] = &[DomainMapping::new(DomainKind::Board, BOARD)];

#[derive(Debug, Clone, Copy, Default)]
pub struct Jira;

impl Connector for Jira {
    type Connection = JiraConnection;
    type Scope = JiraBoard;
    type Options = JiraOptions;

    fn plugin(&self) -> &'static str {
        PLUGIN
    }

    fn catalog(&self) -> &'static [SubtaskMeta] {
        CATALOG
    }

    fn task_options(&self, ctx: &ScopeContext<'_, Self>) -> Result<JiraOptions, CompileError> {
        Ok(JiraOptions {
            connection_id: ctx.connection_id,
            board_id: ctx.scope.board_id,
        })
    }

    fn domain_mappings(&self) -> &'static [DomainMapping] {
        DOMAIN_MAPPINGS
    }

    fn domain_scope(&self, _kind: DomainKind, id: &str, board: &JiraBoard) -> Option<DomainScope> {
        Some(DomainScope::Board(Board {
            id: id.to_string(),
            name: board.name.clone(),
            url: None,
            description: None,
        }))
    }
}
