use chrono::Utc;
use findback_common::{FindbackError, Result};
use findback_embedding::{EmbeddingGenerator, EmbeddingInput};
use findback_matching::{MatchEngine, MatchOutcome};
use findback_store::{BlobStore, ItemDraft, ItemQuery, ItemStore, ItemView};
use std::sync::Arc;
use tracing::{info, warn};

use crate::types::{ItemSubmission, ListFilter, UploadedImage};

/// Item operations: submission, listing, moderation and matching
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    blobs: Arc<dyn BlobStore>,
    embedder: EmbeddingGenerator,
    matcher: MatchEngine,
}

impl ItemService {
    pub fn new(
        store: Arc<dyn ItemStore>,
        blobs: Arc<dyn BlobStore>,
        embedder: EmbeddingGenerator,
        matcher: MatchEngine,
    ) -> Self {
        Self {
            store,
            blobs,
            embedder,
            matcher,
        }
    }

    /// Validate, upload, embed and persist a new report; returns its id
    pub async fn create_item(
        &self,
        submission: ItemSubmission,
        image: Option<UploadedImage>,
    ) -> Result<String> {
        let status = submission.validate()?;

        let blob = match image {
            Some(image) => Some(
                self.blobs
                    .put(&image.bytes, &image.content_type, image.filename.as_deref())
                    .await?,
            ),
            None => None,
        };
        let image_ref = blob.as_ref().map(|b| b.internal_uri.clone());
        let blob_name = blob.as_ref().map(|b| b.name.clone());

        let input = EmbeddingInput::new(submission.description.clone(), image_ref.clone());
        let embedding = if input.is_empty() {
            info!("No description or image for '{}', skipping embedding", submission.name);
            Vec::new()
        } else {
            match self.embedder.generate(&input).await {
                Some(vector) => vector,
                None => {
                    warn!(
                        "Embedding unavailable for '{}'; storing item without a vector",
                        submission.name
                    );
                    Vec::new()
                }
            }
        };

        let trimmed = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        // server-owned fields first, then the allow-listed client fields
        let draft = ItemDraft {
            is_approved: false,
            is_resolved: false,
            created_at: Utc::now(),
            embedding,
            image_ref,
            image_url: blob.map(|b| b.signed_url),
            status,
            name: submission.name.trim().to_string(),
            category: submission.category.trim().to_string(),
            description: trimmed(submission.description),
            location: trimmed(submission.location),
            contact: trimmed(submission.contact),
        };

        let record = match self.store.insert(draft).await {
            Ok(record) => record,
            Err(e) => {
                if let Some(name) = blob_name {
                    if let Err(cleanup) = self.blobs.delete(&name).await {
                        warn!("Failed to remove orphaned blob {}: {}", name, cleanup);
                    }
                }
                return Err(e);
            }
        };
        info!(
            "Item created: {} ({}, embedding dim {})",
            record.id,
            record.status,
            record.embedding.len()
        );
        Ok(record.id)
    }

    /// Approved, unresolved items matching the filters
    pub async fn list_items(&self, filter: ListFilter) -> Result<Vec<ItemView>> {
        let query = ItemQuery {
            status: filter.status,
            category: filter.category,
            location: filter.location,
            sort: filter.sort,
            ..ItemQuery::listed()
        };
        let records = self.store.query(&query).await?;
        Ok(records.iter().map(|r| r.to_view()).collect())
    }

    pub async fn get_item(&self, id: &str) -> Result<ItemView> {
        self.store
            .get(id)
            .await?
            .map(|r| r.to_view())
            .ok_or_else(|| FindbackError::not_found(format!("item {}", id)))
    }

    pub async fn approve_item(&self, id: &str) -> Result<ItemView> {
        let record = self.store.update_flags(id, Some(true), None).await?;
        info!("Item approved: {}", id);
        Ok(record.to_view())
    }

    pub async fn resolve_item(&self, id: &str) -> Result<ItemView> {
        let record = self.store.update_flags(id, None, Some(true)).await?;
        info!("Item resolved: {}", id);
        Ok(record.to_view())
    }

    pub async fn find_matches(&self, id: &str) -> Result<MatchOutcome> {
        self.matcher.find_matches(id).await
    }
}
