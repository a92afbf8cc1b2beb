use async_trait::async_trait;
use findback_common::{FindbackError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::item_store::{apply_flags, new_item_id, ItemStore};
use crate::query::ItemQuery;
use crate::types::{ItemDraft, ItemRecord};

/// Item store persisted as a single JSON file
///
/// Records live in memory behind a lock. A write builds the next map, saves
/// it, and only then swaps it in, so the memory view never runs ahead of the
/// file even when the calling future is dropped mid-save.
pub struct JsonFileItemStore {
    records: RwLock<HashMap<String, ItemRecord>>,
    file_path: PathBuf,
}

impl JsonFileItemStore {
    /// Load records from `path`, starting empty if the file does not exist
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let records: Vec<ItemRecord> = if tokio::fs::try_exists(path).await? {
            let data = tokio::fs::read_to_string(path).await?;
            serde_json::from_str(&data).map_err(|e| {
                FindbackError::store(format!(
                    "Failed to parse item file {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            Vec::new()
        };

        info!(
            "Item store loaded - {} records from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id.clone(), r)).collect()),
            file_path: path.to_path_buf(),
        })
    }

    async fn save(&self, records: &HashMap<String, ItemRecord>) -> Result<()> {
        // Stable file layout: oldest first
        let mut ordered: Vec<&ItemRecord> = records.values().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let data = serde_json::to_string_pretty(&ordered)?;
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.file_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data).await.map_err(|e| {
            FindbackError::store(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &self.file_path).await.map_err(|e| {
            FindbackError::store(format!(
                "Failed to replace {}: {}",
                self.file_path.display(),
                e
            ))
        })?;

        debug!("Item store saved - {} records", records.len());
        Ok(())
    }
}

#[async_trait]
impl ItemStore for JsonFileItemStore {
    async fn insert(&self, draft: ItemDraft) -> Result<ItemRecord> {
        let record = draft.into_record(new_item_id());

        let mut records = self.records.write().await;
        let mut next = records.clone();
        next.insert(record.id.clone(), record.clone());
        self.save(&next).await?;
        *records = next;

        info!(item_id = %record.id, status = %record.status, "Item stored");
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
        let mut next = records.clone();
        let updated = apply_flags(&mut next, id, approved, resolved)?;

        self.save(&next).await?;
        *records = next;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemStatus;
    use chrono::Utc;
    use tempfile::TempDir;

    fn draft(status: ItemStatus) -> ItemDraft {
        ItemDraft {
            name: "Umbrella".to_string(),
            status,
            category: "accessories".to_string(),
            description: Some("black folding umbrella".to_string()),
            location: Some("station".to_string()),
            contact: None,
            image_ref: None,
            image_url: None,
            embedding: vec![0.1, 0.2, 0.3],
            is_approved: false,
            is_resolved: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_records_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");

        let store = JsonFileItemStore::load(&path).await.unwrap();
        let lost = store.insert(draft(ItemStatus::Lost)).await.unwrap();
        store.update_flags(&lost.id, Some(true), None).await.unwrap();

        let reloaded = JsonFileItemStore::load(&path).await.unwrap();
        let record = reloaded.get(&lost.id).await.unwrap().unwrap();
        assert!(record.is_approved);
        assert_eq!(record.embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(reloaded.query(&ItemQuery::listed()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_finite_embedding_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");

        let store = JsonFileItemStore::load(&path).await.unwrap();
        let mut bad = draft(ItemStatus::Found);
        bad.embedding = vec![f32::INFINITY, 1.0];
        let stored = store.insert(bad).await.unwrap();
        assert!(!stored.has_embedding());
        store.insert(draft(ItemStatus::Lost)).await.unwrap();

        let reloaded = JsonFileItemStore::load(&path).await.unwrap();
        let record = reloaded.get(&stored.id).await.unwrap().unwrap();
        assert!(record.embedding.is_empty());
        assert_eq!(reloaded.query(&ItemQuery::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");

        let store = JsonFileItemStore::load(&path).await.unwrap();
        let lost = store.insert(draft(ItemStatus::Lost)).await.unwrap();

        // a directory in place of the file makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.insert(draft(ItemStatus::Found)).await.unwrap_err();
        assert!(matches!(err, FindbackError::Store(_)));
        assert_eq!(store.query(&ItemQuery::default()).await.unwrap().len(), 1);

        assert!(store.update_flags(&lost.id, Some(true), None).await.is_err());
        assert!(!store.get(&lost.id).await.unwrap().unwrap().is_approved);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileItemStore::load(dir.path().join("none.json")).await.unwrap();
        assert!(store.query(&ItemQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_store_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileItemStore::load(&path).await.err().unwrap();
        assert!(matches!(err, FindbackError::Store(_)));
    }
}
