//! Domain entity types
//!
//! Entities are the connector-independent capability categories a user asks
//! to collect. They drive both subtask selection and domain-scope creation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Abstract capability category requested for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    #[serde(rename = "CODE")]
    Code,
    #[serde(rename = "TICKET")]
    Ticket,
    #[serde(rename = "CODEREVIEW", alias = "CODE_REVIEW")]
    CodeReview,
    #[serde(rename = "CROSS")]
    Cross,
    #[serde(rename = "CICD")]
    Cicd,
    #[serde(rename = "CODEQUALITY", alias = "CODE_QUALITY")]
    CodeQuality,
}

impl EntityTag {
    /// Every entity, in the order they are presented to users
    pub const ALL: [EntityTag; 6] = [
        EntityTag::Code,
        EntityTag::Ticket,
        EntityTag::CodeReview,
        EntityTag::Cross,
        EntityTag::Cicd,
        EntityTag::CodeQuality,
    ];

    /// Wire representation of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTag::Code => "CODE",
            EntityTag::Ticket => "TICKET",
            EntityTag::CodeReview => "CODEREVIEW",
            EntityTag::Cross => "CROSS",
            EntityTag::Cicd => "CICD",
            EntityTag::CodeQuality => "CODEQUALITY",
        }
    }
}

impl std::fmt::Display for EntityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known entity tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntity(pub String);

impl std::fmt::Display for UnknownEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown entity '{}'", self.0)
    }
}

impl std::error::Error for UnknownEntity {}

impl FromStr for EntityTag {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CODE" => Ok(EntityTag::Code),
            "TICKET" => Ok(EntityTag::Ticket),
            "CODEREVIEW" | "CODE_REVIEW" => Ok(EntityTag::CodeReview),
            "CROSS" => Ok(EntityTag::Cross),
            "CICD" => Ok(EntityTag::Cicd),
            "CODEQUALITY" | "CODE_QUALITY" => Ok(EntityTag::CodeQuality),
            _ => Err(UnknownEntity(s.to_string())),
        }
    }
}

/// Ordered set of entity tags
///
/// Ordering is by tag, so iteration never depends on the order the user
/// listed entities in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntitySet(BTreeSet<EntityTag>);

impl EntitySet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Set containing every known entity
    pub fn all() -> Self {
        EntityTag::ALL.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, tag: EntityTag) -> bool {
        self.0.contains(&tag)
    }

    /// True if any of `tags` is in the set
    pub fn contains_any(&self, tags: &[EntityTag]) -> bool {
        tags.iter().any(|t| self.0.contains(t))
    }

    pub fn insert(&mut self, tag: EntityTag) -> bool {
        self.0.insert(tag)
    }

    pub fn remove(&mut self, tag: EntityTag) -> bool {
        self.0.remove(&tag)
    }

    /// Entities in `self` that are not in `other`
    pub fn without(&self, other: &EntitySet) -> EntitySet {
        EntitySet(self.0.difference(&other.0).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<EntityTag> for EntitySet {
    fn from_iter<I: IntoIterator<Item = EntityTag>>(iter: I) -> Self {
        EntitySet(iter.into_iter().collect())
    }
}

impl From<&[EntityTag]> for EntitySet {
    fn from(tags: &[EntityTag]) -> Self {
        tags.iter().copied().collect()
    }
}

impl<const N: usize> From<[EntityTag; N]> for EntitySet {
    fn from(tags: [EntityTag; N]) -> Self {
        tags.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_wire_names() {
        let json = serde_json::to_string(&EntityTag::CodeReview).unwrap();
        assert_eq!(json, "\"CODEREVIEW\"");

        let parsed: EntityTag = serde_json::from_str("\"CODE_QUALITY\"").unwrap();
        assert_eq!(parsed, EntityTag::CodeQuality);
    }

    #[test]
    fn test_entity_from_str() {
        assert_eq!("cicd".parse::<EntityTag>(), Ok(EntityTag::Cicd));
        assert_eq!("CODE_REVIEW".parse::<EntityTag>(), Ok(EntityTag::CodeReview));
        assert!("DEPLOYMENTS".parse::<EntityTag>().is_err());
    }

    #[test]
    fn test_entity_set_is_order_independent() {
        let a: EntitySet = [EntityTag::Cicd, EntityTag::Code].into();
        let b: EntitySet = [EntityTag::Code, EntityTag::Cicd, EntityTag::Code].into();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            "[\"CODE\",\"CICD\"]"
        );
    }

    #[test]
    fn test_entity_set_without() {
        let all = EntitySet::all();
        let blocked: EntitySet = [EntityTag::Code, EntityTag::CodeReview].into();
        let rest = all.without(&blocked);
        assert_eq!(rest.len(), 4);
        assert!(!rest.contains(EntityTag::Code));
        assert!(rest.contains_any(&[EntityTag::Code, EntityTag::Ticket]));
    }
}
