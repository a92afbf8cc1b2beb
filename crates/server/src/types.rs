use findback_common::{FindbackError, Result};
use findback_matching::{ItemMatch, MatchOutcome};
use findback_store::{ItemStatus, ItemView, SortField, SortOrder, SortSpec};
use serde::{Deserialize, Serialize};

/// Client-writable item fields
///
/// Anything not listed here (approval, resolution, timestamps, vectors) is
/// owned by the server and cannot be supplied by a reporter.
#[derive(Debug, Clone, Default)]
pub struct ItemSubmission {
    pub name: String,

    pub status: String,

    pub category: String,

    pub description: Option<String>,

    pub location: Option<String>,

    pub contact: Option<String>,
}

impl ItemSubmission {
    /// Set a form field by name; returns false for fields outside the allow-list
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        match name {
            "name" => self.name = value,
            "status" => self.status = value,
            "category" => self.category = value,
            "description" => self.description = Some(value),
            "location" => self.location = Some(value),
            "contact" => self.contact = Some(value),
            _ => return false,
        }
        true
    }

    /// Check required fields and parse the status
    pub fn validate(&self) -> Result<ItemStatus> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.status.trim().is_empty() {
            missing.push("status");
        }
        if self.category.trim().is_empty() {
            missing.push("category");
        }
        if !missing.is_empty() {
            return Err(FindbackError::invalid_input(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        self.status.parse()
    }
}

/// Image received with a submission
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: Option<String>,
}

/// Item listing query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Validated listing filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub category: Option<String>,
    pub status: Option<ItemStatus>,
    pub location: Option<String>,
    pub sort: SortSpec,
}

impl TryFrom<ListQuery> for ListFilter {
    type Error = FindbackError;

    fn try_from(query: ListQuery) -> Result<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let field = present(query.sort_by)
            .map(|s| s.parse::<SortField>())
            .transpose()?
            .unwrap_or_default();
        let order = present(query.order)
            .map(|s| s.parse::<SortOrder>())
            .transpose()?
            .unwrap_or(SortOrder::Desc);

        Ok(Self {
            category: present(query.category),
            status: present(query.status)
                .map(|s| s.parse::<ItemStatus>())
                .transpose()?,
            location: present(query.location),
            sort: SortSpec::new(field, order),
        })
    }
}

/// Signed blob link parameters
#[derive(Debug, Deserialize)]
pub struct BlobQuery {
    pub expires: i64,
    pub signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemResponse {
    pub item_id: String,
}

#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<ItemView>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub target_status: ItemStatus,
    pub matches: Vec<ItemMatch>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<MatchOutcome> for MatchResponse {
    fn from(outcome: MatchOutcome) -> Self {
        Self {
            target_status: outcome.target_status,
            count: outcome.matches.len(),
            matches: outcome.matches,
            note: outcome.note,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
