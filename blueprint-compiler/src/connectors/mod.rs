//! Bundled connector policies
//!
//! Each module holds the decoded connection and scope records of one data
//! source, its subtask catalog and its [`Connector`](crate::Connector) impl.

pub mod azuredevops;
pub mod bamboo;
pub mod bitbucket;
pub mod gitee;
pub mod github;
pub mod gitlab;
pub mod jenkins;
pub mod jira;
pub mod sonarqube;

use blueprint_core::domain::entity::EntityTag;

// Entity groups shared by the catalogs and domain mappings below

pub(crate) const CODE: &[EntityTag] = &[EntityTag::Code];
pub(crate) const TICKET: &[EntityTag] = &[EntityTag::Ticket];
pub(crate) const CICD: &[EntityTag] = &[EntityTag::Cicd];
pub(crate) const CROSS: &[EntityTag] = &[EntityTag::Cross];
pub(crate) const CODE_QUALITY: &[EntityTag] = &[EntityTag::CodeQuality];
pub(crate) const REVIEW: &[EntityTag] = &[EntityTag::CodeReview, EntityTag::Cross];
pub(crate) const REPO: &[EntityTag] = &[EntityTag::Code, EntityTag::CodeReview, EntityTag::Cross];
pub(crate) const BOARD: &[EntityTag] = &[EntityTag::Ticket, EntityTag::Cross];
pub(crate) const ANY: &[EntityTag] = &[
    EntityTag::Code,
    EntityTag::Ticket,
    EntityTag::CodeReview,
    EntityTag::Cross,
    EntityTag::Cicd,
];

pub(crate) fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
