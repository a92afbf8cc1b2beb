use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::extract::{extract_vector, DEFAULT_SEARCH_DEPTH};
use crate::provider::EmbeddingProvider;
use crate::types::EmbeddingInput;

/// Turns item descriptions into vectors via an [`EmbeddingProvider`]
#[derive(Clone)]
pub struct EmbeddingGenerator {
    provider: Arc<dyn EmbeddingProvider>,
    search_depth: usize,
}

impl EmbeddingGenerator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_search_depth(provider, DEFAULT_SEARCH_DEPTH)
    }

    pub fn with_search_depth(provider: Arc<dyn EmbeddingProvider>, search_depth: usize) -> Self {
        Self {
            provider,
            search_depth,
        }
    }

    /// Generate an embedding, or `None` on any provider failure.
    ///
    /// Failures are logged and absorbed so item creation can continue with
    /// an empty vector. Callers should not invoke this with an empty input.
    pub async fn generate(&self, input: &EmbeddingInput) -> Option<Vec<f32>> {
        let Some(request) = input.to_request() else {
            debug!("Embedding skipped: no text or image supplied");
            return None;
        };

        let body = match self.provider.predict(&request).await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    "Embedding provider '{}' failed ({} request): {}",
                    self.provider.name(),
                    request.kind(),
                    e
                );
                return None;
            }
        };

        match extract_vector(&body, self.search_depth) {
            Some(vector) => {
                info!(
                    "Generated {} embedding - Dimension: {}",
                    request.kind(),
                    vector.len()
                );
                Some(vector)
            }
            None => {
                warn!(
                    "Embedding provider '{}' returned no numeric vector within depth {}",
                    self.provider.name(),
                    self.search_depth
                );
                None
            }
        }
    }
}
