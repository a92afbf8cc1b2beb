use async_trait::async_trait;
use findback_common::{FindbackError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::query::ItemQuery;
use crate::types::{ItemDraft, ItemRecord};

/// Document store holding item records
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new record and assign its id
    async fn insert(&self, draft: ItemDraft) -> Result<ItemRecord>;

    /// Point lookup by id
    async fn get(&self, id: &str) -> Result<Option<ItemRecord>>;

    /// Equality-filtered, ordered scan
    async fn query(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>>;

    /// Set moderation flags; `None` leaves a flag unchanged
    async fn update_flags(
        &self,
        id: &str,
        approved: Option<bool>,
        resolved: Option<bool>,
    ) -> Result<ItemRecord>;
}

/// Generate a fresh record id
pub(crate) fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn apply_flags(
    records: &mut HashMap<String, ItemRecord>,
    id: &str,
    approved: Option<bool>,
    resolved: Option<bool>,
) -> Result<ItemRecord> {
    let record = records
        .get_mut(id)
        .ok_or_else(|| FindbackError::not_found(format!("item {}", id)))?;
    if let Some(approved) = approved {
        record.is_approved = approved;
    }
    if let Some(resolved) = resolved {
        record.is_resolved = resolved;
    }
    Ok(record.clone())
}

/// In-memory implementation of ItemStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemStore {
    records: Arc<RwLock<HashMap<String, ItemRecord>>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with a caller-chosen id
    pub async fn insert_with_id(&self, id: impl Into<String>, draft: ItemDraft) -> ItemRecord {
        let record = draft.into_record(id.into());
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        record
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert(&self, draft: ItemDraft) -> Result<ItemRecord> {
        let record = self.insert_with_id(new_item_id(), draft).await;
        tracing::debug!(item_id = %record.id, "Inserted item");
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<ItemRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>> {
        let records = self.records.read().await;
        Ok(query.apply(records.values()))
    }

    async fn update_flags(
        &self,
        id: &str,
        approved: Option<bool>,
        resolved: Option<bool>,
    ) -> Result<ItemRecord> {
        let mut records = self.records.write().await;
        apply_flags(&mut records, id, approved, resolved)
    }
}
