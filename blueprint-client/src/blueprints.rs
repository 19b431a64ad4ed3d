//! Blueprint compilation endpoints

use blueprint_core::domain::blueprint::BlueprintSettings;
use blueprint_core::dto::compile::{CompileRequest, CompileResponse};

use crate::BlueprintClient;
use crate::error::Result;

impl BlueprintClient {
    /// Compile the scopes of one connection
    pub async fn compile(&self, req: &CompileRequest) -> Result<CompileResponse> {
        tracing::debug!(plugin = %req.plugin, connection_id = req.connection_id, "Requesting compile");
        let response = self
            .client
            .post(self.url("/blueprint/compile"))
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Compile every connection of a blueprint into one plan
    pub async fn plan(&self, settings: &BlueprintSettings) -> Result<CompileResponse> {
        tracing::debug!(connections = settings.connections.len(), "Requesting plan");
        let response = self
            .client
            .post(self.url("/blueprint/plan"))
            .json(settings)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use blueprint_core::domain::blueprint::SyncPolicy;

    #[tokio::test]
    async fn test_compile_unreachable_orchestrator() {
        // Nothing listens on the discard port
        let client = BlueprintClient::new("http://127.0.0.1:9");
        let req = CompileRequest {
            plugin: "github".to_string(),
            connection_id: 1,
            scopes: vec![],
            sync_policy: SyncPolicy::default(),
        };

        let err = client.compile(&req).await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }
}
