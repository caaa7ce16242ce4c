// Trait seam for the search service. The model seams live in ai-client
// (`TextModel`, `VisionModel`); together they let the pipeline run against
// mocks with no network.

use async_trait::async_trait;
use serper_client::SerperClient;

/// A web search backend returning the provider's raw JSON payload.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> serper_client::Result<serde_json::Value>;
}

#[async_trait]
impl WebSearch for SerperClient {
    async fn search(&self, query: &str) -> serper_client::Result<serde_json::Value> {
        SerperClient::search(self, query).await
    }
}
