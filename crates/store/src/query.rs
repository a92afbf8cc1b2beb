use findback_common::FindbackError;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::types::{ItemRecord, ItemStatus};

/// Field an item listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    Category,
    Location,
    Status,
}

impl FromStr for SortField {
    type Err = FindbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "createdAt" | "created_at" | "date" => Ok(Self::CreatedAt),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "location" => Ok(Self::Location),
            "status" => Ok(Self::Status),
            other => Err(FindbackError::invalid_input(format!(
                "cannot sort by '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = FindbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(FindbackError::invalid_input(format!(
                "sort order must be 'asc' or 'desc', got '{}'",
                other
            ))),
        }
    }
}

/// Ordering clause; id breaks ties so the order is total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Oldest first
    pub fn oldest_first() -> Self {
        Self::new(SortField::CreatedAt, SortOrder::Asc)
    }

    /// Newest first
    pub fn newest_first() -> Self {
        Self::new(SortField::CreatedAt, SortOrder::Desc)
    }

    fn compare(&self, a: &ItemRecord, b: &ItemRecord) -> Ordering {
        let by_field = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Location => a.location.cmp(&b.location),
            SortField::Status => a.status.cmp(&b.status),
        };
        let ordering = by_field.then_with(|| a.id.cmp(&b.id));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Equality filters plus an ordering clause
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub status: Option<ItemStatus>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub approved: Option<bool>,
    pub resolved: Option<bool>,
    pub sort: SortSpec,
}

impl ItemQuery {
    /// Approved, unresolved items only
    pub fn listed() -> Self {
        Self {
            approved: Some(true),
            resolved: Some(false),
            ..Self::default()
        }
    }

    /// Match candidates for a given status, in scan order
    pub fn candidates(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            sort: SortSpec::oldest_first(),
            ..Self::listed()
        }
    }

    pub fn matches(&self, record: &ItemRecord) -> bool {
        self.status.map_or(true, |s| record.status == s)
            && self
                .category
                .as_ref()
                .map_or(true, |c| &record.category == c)
            && self
                .location
                .as_ref()
                .map_or(true, |l| record.location.as_ref() == Some(l))
            && self.approved.map_or(true, |a| record.is_approved == a)
            && self.resolved.map_or(true, |r| record.is_resolved == r)
    }

    /// Filter and order a set of records
    pub fn apply<'a, I>(&self, records: I) -> Vec<ItemRecord>
    where
        I: IntoIterator<Item = &'a ItemRecord>,
    {
        let mut selected: Vec<ItemRecord> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        selected.sort_by(|a, b| self.sort.compare(a, b));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemDraft;
    use chrono::{Duration, TimeZone, Utc};

    fn record(id: &str, status: ItemStatus, minutes: i64, approved: bool) -> ItemRecord {
        ItemDraft {
            name: format!("item-{}", id),
            status,
            category: "bags".to_string(),
            description: None,
            location: Some("library".to_string()),
            contact: None,
            image_ref: None,
            image_url: None,
            embedding: Vec::new(),
            is_approved: approved,
            is_resolved: false,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
        .into_record(id.to_string())
    }

    #[test]
    fn test_listed_filters_unapproved_and_resolved() {
        let mut resolved = record("c", ItemStatus::Lost, 2, true);
        resolved.is_resolved = true;
        let records = vec![
            record("a", ItemStatus::Lost, 0, true),
            record("b", ItemStatus::Lost, 1, false),
            resolved,
        ];

        let ids: Vec<_> = ItemQuery::listed()
            .apply(&records)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_candidates_filter_status_and_sort_oldest_first() {
        let records = vec![
            record("late", ItemStatus::Found, 10, true),
            record("lost", ItemStatus::Lost, 0, true),
            record("early", ItemStatus::Found, 1, true),
        ];

        let ids: Vec<_> = ItemQuery::candidates(ItemStatus::Found)
            .apply(&records)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_equal_keys_break_ties_by_id() {
        let records = vec![
            record("b", ItemStatus::Found, 0, true),
            record("a", ItemStatus::Found, 0, true),
        ];
        let ids: Vec<_> = ItemQuery::listed()
            .apply(&records)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_descending_and_category_filter() {
        let mut other = record("x", ItemStatus::Lost, 5, true);
        other.category = "electronics".to_string();
        let records = vec![
            record("a", ItemStatus::Lost, 0, true),
            record("b", ItemStatus::Found, 3, true),
            other,
        ];

        let query = ItemQuery {
            category: Some("bags".to_string()),
            sort: SortSpec::newest_first(),
            ..ItemQuery::listed()
        };
        let ids: Vec<_> = query.apply(&records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!("createdAt".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert!("embedding".parse::<SortField>().is_err());
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
    }
}
