use async_trait::async_trait;
use findback_common::Result;
use serde_json::Value;

use crate::types::EmbedRequest;

/// External embedding provider
///
/// Returns the raw response body; locating the vector inside it is the
/// generator's job, since response schemas drift between providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Send a single embedding request
    async fn predict(&self, request: &EmbedRequest) -> Result<Value>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
