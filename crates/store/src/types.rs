use chrono::{DateTime, Utc};
use findback_common::FindbackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Whether an item was lost or found
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
}

impl ItemStatus {
    /// The status an item must have to be a match candidate
    pub fn opposite(self) -> Self {
        match self {
            Self::Lost => Self::Found,
            Self::Found => Self::Lost,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = FindbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            other => Err(FindbackError::invalid_input(format!(
                "status must be 'lost' or 'found', got '{}'",
                other
            ))),
        }
    }
}

/// Persisted item report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Store-assigned identifier
    pub id: String,

    pub name: String,

    pub status: ItemStatus,

    pub category: String,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// How to reach the reporter
    #[serde(default)]
    pub contact: Option<String>,

    /// Stable internal URI of the uploaded image
    #[serde(default)]
    pub image_ref: Option<String>,

    /// Time-limited read URL issued at upload
    #[serde(default)]
    pub image_url: Option<String>,

    /// Embedding vector, empty when generation failed or was skipped
    #[serde(default)]
    pub embedding: Vec<f32>,

    #[serde(default)]
    pub is_approved: bool,

    #[serde(default)]
    pub is_resolved: bool,

    pub created_at: DateTime<Utc>,
}

impl ItemRecord {
    pub fn has_embedding(&self) -> bool {
        !self.embedding.is_empty()
    }

    /// Approved and unresolved items are visible and matchable
    pub fn is_listed(&self) -> bool {
        self.is_approved && !self.is_resolved
    }

    /// Public projection without the vector
    pub fn to_view(&self) -> ItemView {
        ItemView {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status,
            category: self.category.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            contact: self.contact.clone(),
            image_url: self.image_url.clone(),
            is_approved: self.is_approved,
            is_resolved: self.is_resolved,
            has_embedding: self.has_embedding(),
            created_at: self.created_at,
        }
    }
}

/// A record before the store assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub status: ItemStatus,
    pub category: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub image_ref: Option<String>,
    pub image_url: Option<String>,
    pub embedding: Vec<f32>,
    pub is_approved: bool,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl ItemDraft {
    /// Attach the store-assigned id
    ///
    /// A vector with non-finite components is dropped: JSON cannot hold it and
    /// it would poison every similarity it takes part in.
    pub fn into_record(self, id: String) -> ItemRecord {
        let embedding = if self.embedding.iter().all(|v| v.is_finite()) {
            self.embedding
        } else {
            warn!(item_id = %id, "Discarding embedding with non-finite components");
            Vec::new()
        };

        ItemRecord {
            id,
            name: self.name,
            status: self.status,
            category: self.category,
            description: self.description,
            location: self.location,
            contact: self.contact,
            image_ref: self.image_ref,
            image_url: self.image_url,
            embedding,
            is_approved: self.is_approved,
            is_resolved: self.is_resolved,
            created_at: self.created_at,
        }
    }
}

/// Item as returned to API callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub status: ItemStatus,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_approved: bool,
    pub is_resolved: bool,
    pub has_embedding: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_opposite() {
        assert_eq!(ItemStatus::Lost.opposite(), ItemStatus::Found);
        assert_eq!(ItemStatus::Found.opposite(), ItemStatus::Lost);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Lost".parse::<ItemStatus>().unwrap(), ItemStatus::Lost);
        assert_eq!(" found ".parse::<ItemStatus>().unwrap(), ItemStatus::Found);
        assert!("stolen".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn test_record_json_is_camel_case() {
        let record = ItemDraft {
            name: "Wallet".to_string(),
            status: ItemStatus::Lost,
            category: "accessories".to_string(),
            description: None,
            location: None,
            contact: None,
            image_ref: None,
            image_url: None,
            embedding: vec![0.5],
            is_approved: true,
            is_resolved: false,
            created_at: Utc::now(),
        }
        .into_record("abc".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "lost");
        assert_eq!(json["isApproved"], true);
        assert!(json.get("createdAt").is_some());

        let view = serde_json::to_value(record.to_view()).unwrap();
        assert!(view.get("embedding").is_none());
        assert_eq!(view["hasEmbedding"], true);
    }
}
