//! Findback storage
//!
//! Item records (document store) and uploaded images (blob store)

mod blob;
mod item_store;
mod json_store;
mod query;
mod types;

pub use blob::{BlobStore, LocalBlobStore, StoredBlob};
pub use item_store::{InMemoryItemStore, ItemStore};
pub use json_store::JsonFileItemStore;
pub use query::{ItemQuery, SortField, SortOrder, SortSpec};
pub use types::{ItemDraft, ItemRecord, ItemStatus, ItemView};
