//! Client errors
//!
//! The orchestrator reports compile failures as a status plus an `{error}`
//! message: 404 when a plugin, connection, scope or scope config is unknown,
//! 400 when the request itself is invalid and 500 for everything else.
//! Failures that name a scope quote it as `scope '<id>'` in the message.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The orchestrator could not be reached or the transfer broke off
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The orchestrator answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The body was not a plan, plugin list or health answer
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Connection, scope, scope config or plugin unknown to the orchestrator
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// The blueprint or compile request was rejected as invalid
    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::ApiError { status: 400, .. })
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Scope id the orchestrator blamed for the failure, if any
    pub fn rejected_scope(&self) -> Option<&str> {
        let Self::ApiError { message, .. } = self else {
            return None;
        };
        let start = message.find("scope '")? + "scope '".len();
        let len = message[start..].find('\'')?;
        Some(&message[start..start + len])
    }
}
