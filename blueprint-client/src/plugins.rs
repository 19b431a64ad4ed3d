//! Connector listing and health endpoints

use blueprint_core::dto::plugin::PluginSummary;

use crate::BlueprintClient;
use crate::error::{ClientError, Result};

impl BlueprintClient {
    /// List the connectors the orchestrator can plan for
    pub async fn list_plugins(&self) -> Result<Vec<PluginSummary>> {
        let response = self.client.get(self.url("/plugins")).send().await?;

        self.handle_response(response).await
    }

    /// Check that the orchestrator is up
    pub async fn health(&self) -> Result<()> {
        let response = self.client.get(self.url("/health")).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        Ok(())
    }
}
