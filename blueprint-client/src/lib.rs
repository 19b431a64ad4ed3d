//! Blueprint HTTP Client
//!
//! A type-safe HTTP client for the blueprint orchestrator API, used by the
//! CLI to compile blueprints remotely.
//!
//! # Example
//!
//! ```no_run
//! use blueprint_client::BlueprintClient;
//! use blueprint_core::domain::blueprint::{BlueprintScopeRef, SyncPolicy};
//! use blueprint_core::dto::compile::CompileRequest;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BlueprintClient::new("http://localhost:8080");
//!
//! let response = client
//!     .compile(&CompileRequest {
//!         plugin: "github".to_string(),
//!         connection_id: 1,
//!         scopes: vec![BlueprintScopeRef::new("42")],
//!         sync_policy: SyncPolicy::default(),
//!     })
//!     .await?;
//!
//! println!("{} stages", response.plan.len());
//! # Ok(())
//! # }
//! ```

mod blueprints;
pub mod error;
mod plugins;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the blueprint orchestrator API
#[derive(Debug, Clone)]
pub struct BlueprintClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8080")
    base_url: String,
    client: Client,
}

impl BlueprintClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use blueprint_client::BlueprintClient;
    ///
    /// let client = BlueprintClient::new("http://localhost:8080/");
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(
                status.as_u16(),
                error_message(&error_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Pull the message out of an `{"error": "..."}` body, falling back to the
/// raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BlueprintClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/health"), "http://localhost:8080/health");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = BlueprintClient::new("http://localhost:8080///");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = BlueprintClient::with_client("http://localhost:8080", http_client);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error":"plugin 'tapd' is not registered"}"#),
            "plugin 'tapd' is not registered"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"message":"x"}"#), r#"{"message":"x"}"#);
    }
}
