//! Domain id generation
//!
//! Ids have the form `plugin:TypeName:connectionId:naturalKey`. Plugin and
//! type names may not contain the delimiter and the connection id is decimal,
//! so the natural key (always last) can hold anything without escaping.

use std::fmt::Display;

use thiserror::Error;

pub const ID_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdGenError {
    #[error("invalid id component '{0}': must be non-empty and free of ':'")]
    InvalidComponent(String),
}

/// Generates domain ids for one tool scope type of one connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainIdGenerator {
    prefix: String,
}

impl DomainIdGenerator {
    pub fn new(plugin: &str, type_name: &str) -> Result<Self, IdGenError> {
        for component in [plugin, type_name] {
            if component.is_empty() || component.contains(ID_DELIMITER) {
                return Err(IdGenError::InvalidComponent(component.to_string()));
            }
        }
        Ok(Self {
            prefix: format!("{}{}{}", plugin, ID_DELIMITER, type_name),
        })
    }

    pub fn generate(&self, connection_id: u64, key: impl Display) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.prefix,
            connection_id,
            key,
            d = ID_DELIMITER
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        let idgen = DomainIdGenerator::new("azuredevops_go", "AzuredevopsRepo").unwrap();
        assert_eq!(
            idgen.generate(1, "ad05901f-c9b0-4938-bc8a-a22eb2467ceb"),
            "azuredevops_go:AzuredevopsRepo:1:ad05901f-c9b0-4938-bc8a-a22eb2467ceb"
        );
    }

    #[test]
    fn test_generate_is_stable() {
        let idgen = DomainIdGenerator::new("github", "GithubRepo").unwrap();
        let first = idgen.generate(3, 42);
        let _ = idgen.generate(4, 43);
        assert_eq!(first, idgen.generate(3, 42));
    }

    #[test]
    fn test_generate_is_injective() {
        let idgen = DomainIdGenerator::new("bitbucket", "BitbucketRepo").unwrap();
        // Keys containing the delimiter cannot collide with other connections
        assert_ne!(idgen.generate(1, "2:x"), idgen.generate(12, "x"));
        assert_ne!(idgen.generate(1, "a"), idgen.generate(2, "a"));
        assert_ne!(idgen.generate(1, "a"), idgen.generate(1, "b"));
        assert_ne!(idgen.generate(1, "a:b"), idgen.generate(1, "a"));
    }

    #[test]
    fn test_rejects_delimiter_in_names() {
        assert!(DomainIdGenerator::new("git:hub", "GithubRepo").is_err());
        assert!(DomainIdGenerator::new("github", "").is_err());
    }
}
