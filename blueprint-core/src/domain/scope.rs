//! Domain scope types
//!
//! Domain scopes are the cross-connector records used to join data about the
//! same project collected from different tools. Several variants produced
//! from one tool scope share the same id.

use serde::{Deserialize, Serialize};

/// Which domain table a scope belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomainKind {
    Repo,
    Board,
    CicdScope,
    CqProject,
}

impl DomainKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            DomainKind::Repo => "repos",
            DomainKind::Board => "boards",
            DomainKind::CicdScope => "cicd_scopes",
            DomainKind::CqProject => "cq_projects",
        }
    }
}

impl std::fmt::Display for DomainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainKind::Repo => write!(f, "repo"),
            DomainKind::Board => write!(f, "board"),
            DomainKind::CicdScope => write!(f, "cicdScope"),
            DomainKind::CqProject => write!(f, "cqProject"),
        }
    }
}

/// Source code repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forked_from: Option<String>,
}

/// Issue tracking board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// CI/CD pipeline container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CicdScope {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Code quality project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CqProject {
    pub id: String,
    pub name: String,
}

/// A domain-layer scope record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainScope {
    Repo(Repo),
    Board(Board),
    CicdScope(CicdScope),
    CqProject(CqProject),
}

impl DomainScope {
    /// Build the bare variant for `kind` with only id and name populated
    pub fn new(kind: DomainKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        let (id, name) = (id.into(), name.into());
        match kind {
            DomainKind::Repo => DomainScope::Repo(Repo {
                id,
                name,
                url: None,
                forked_from: None,
            }),
            DomainKind::Board => DomainScope::Board(Board {
                id,
                name,
                url: None,
                description: None,
            }),
            DomainKind::CicdScope => DomainScope::CicdScope(CicdScope { id, name, url: None }),
            DomainKind::CqProject => DomainScope::CqProject(CqProject { id, name }),
        }
    }

    pub fn kind(&self) -> DomainKind {
        match self {
            DomainScope::Repo(_) => DomainKind::Repo,
            DomainScope::Board(_) => DomainKind::Board,
            DomainScope::CicdScope(_) => DomainKind::CicdScope,
            DomainScope::CqProject(_) => DomainKind::CqProject,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DomainScope::Repo(s) => &s.id,
            DomainScope::Board(s) => &s.id,
            DomainScope::CicdScope(s) => &s.id,
            DomainScope::CqProject(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DomainScope::Repo(s) => &s.name,
            DomainScope::Board(s) => &s.name,
            DomainScope::CicdScope(s) => &s.name,
            DomainScope::CqProject(s) => &s.name,
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.kind().table_name()
    }
}
