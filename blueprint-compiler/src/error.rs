//! Compiler error types

use thiserror::Error;

use crate::idgen::IdGenError;
use crate::store::StoreError;

/// Broad classification used by API layers to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadInput,
    Internal,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("connection {connection_id} not found for plugin '{plugin}'")]
    ConnectionNotFound { plugin: String, connection_id: u64 },

    #[error("scope '{scope_id}' not found in connection {connection_id}")]
    ScopeNotFound { connection_id: u64, scope_id: String },

    #[error("scope config {scope_config_id} not found (scope '{scope_id}')")]
    ScopeConfigNotFound { scope_id: String, scope_config_id: u64 },

    #[error("plugin '{0}' is not registered")]
    PluginNotFound(String),

    #[error("{}", describe("bad input", .scope_id.as_deref(), .message))]
    BadInput {
        scope_id: Option<String>,
        message: String,
    },

    #[error("{}", describe("internal error", .scope_id.as_deref(), .message))]
    Internal {
        scope_id: Option<String>,
        message: String,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

fn describe(prefix: &str, scope_id: Option<&str>, message: &str) -> String {
    match scope_id {
        Some(id) => format!("{} (scope '{}'): {}", prefix, id, message),
        None => format!("{}: {}", prefix, message),
    }
}

impl CompileError {
    pub fn bad_input(scope_id: impl Into<String>, message: impl Into<String>) -> Self {
        CompileError::BadInput {
            scope_id: Some(scope_id.into()),
            message: message.into(),
        }
    }

    pub fn internal(scope_id: impl Into<String>, message: impl Into<String>) -> Self {
        CompileError::Internal {
            scope_id: Some(scope_id.into()),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::ConnectionNotFound { .. }
            | CompileError::ScopeNotFound { .. }
            | CompileError::ScopeConfigNotFound { .. }
            | CompileError::PluginNotFound(_) => ErrorKind::NotFound,
            CompileError::BadInput { .. } => ErrorKind::BadInput,
            CompileError::Internal { .. } | CompileError::Store(_) => ErrorKind::Internal,
        }
    }

    /// The offending scope, when the error is tied to one
    pub fn scope_id(&self) -> Option<&str> {
        match self {
            CompileError::ScopeNotFound { scope_id, .. }
            | CompileError::ScopeConfigNotFound { scope_id, .. } => Some(scope_id),
            CompileError::BadInput { scope_id, .. } | CompileError::Internal { scope_id, .. } => {
                scope_id.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<IdGenError> for CompileError {
    fn from(err: IdGenError) -> Self {
        CompileError::Internal {
            scope_id: None,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = CompileError::ScopeNotFound {
            connection_id: 1,
            scope_id: "42".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.scope_id(), Some("42"));

        let err = CompileError::bad_input("a/b", "duplicate scope");
        assert_eq!(err.kind(), ErrorKind::BadInput);
        assert_eq!(err.to_string(), "bad input (scope 'a/b'): duplicate scope");

        let err = CompileError::Store(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.scope_id().is_none());
    }

    #[test]
    fn test_idgen_error_is_internal() {
        let err: CompileError = IdGenError::InvalidComponent("a:b".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
