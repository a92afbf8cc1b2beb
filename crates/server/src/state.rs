use findback_common::{AppConfig, Result};
use findback_embedding::{EmbeddingGenerator, HttpEmbeddingClient};
use findback_matching::{MatchEngine, MatchPolicy};
use findback_store::{ItemStore, JsonFileItemStore, LocalBlobStore};
use std::sync::Arc;

use crate::items::ItemService;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Item operations
    pub items: ItemService,

    /// Blob store, also used to check signed links
    pub blobs: Arc<LocalBlobStore>,
}

impl AppState {
    /// Wire the production collaborators from configuration
    pub async fn new(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn ItemStore> =
            Arc::new(JsonFileItemStore::load(&config.items_path).await?);
        let blobs = Arc::new(LocalBlobStore::from_config(&config));
        let provider = Arc::new(HttpEmbeddingClient::from_config(&config)?);
        let embedder =
            EmbeddingGenerator::with_search_depth(provider, config.embedding_search_depth);
        let matcher = MatchEngine::new(store.clone(), MatchPolicy::from_config(&config)?);

        let items = ItemService::new(store, blobs.clone(), embedder, matcher);

        Ok(Self {
            config,
            items,
            blobs,
        })
    }

    /// Assemble state from prepared parts
    pub fn from_parts(config: AppConfig, items: ItemService, blobs: Arc<LocalBlobStore>) -> Self {
        Self {
            config,
            items,
            blobs,
        }
    }
}
