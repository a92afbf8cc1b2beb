use findback_common::{FindbackError, Result};
use findback_store::{ItemQuery, ItemRecord, ItemStore};
use std::sync::Arc;
use tracing::{debug, info};

use crate::similarity::{cosine_similarity, round_score};
use crate::types::{ItemMatch, MatchOutcome, MatchPolicy};

/// Note attached when the query item cannot be matched
pub const NO_EMBEDDING_NOTE: &str = "item has no embedding; matches are unavailable";

/// Ranks opposite-status items against a query item by cosine similarity
pub struct MatchEngine {
    store: Arc<dyn ItemStore>,
    policy: MatchPolicy,
}

impl MatchEngine {
    pub fn new(store: Arc<dyn ItemStore>, policy: MatchPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Find ranked matches for a stored item
    ///
    /// Read-only: dropping the future mid-scan leaves nothing behind.
    pub async fn find_matches(&self, query_id: &str) -> Result<MatchOutcome> {
        let query = self
            .store
            .get(query_id)
            .await?
            .ok_or_else(|| FindbackError::not_found(format!("item {}", query_id)))?;

        let target_status = query.status.opposite();

        if !query.has_embedding() {
            info!("Item {} has no embedding, skipping match scan", query_id);
            return Ok(MatchOutcome {
                target_status,
                matches: Vec::new(),
                note: Some(NO_EMBEDDING_NOTE.to_string()),
            });
        }

        let candidates = self
            .store
            .query(&ItemQuery::candidates(target_status))
            .await?;
        let total_candidates = candidates.len();

        let matches = rank(&query, &candidates, &self.policy);

        info!(
            "Match scan for {} completed - {} results (from {} {} candidates)",
            query_id,
            matches.len(),
            total_candidates,
            target_status
        );

        Ok(MatchOutcome {
            target_status,
            matches,
            note: None,
        })
    }
}

/// Score, filter and order `candidates` against `query`
///
/// Candidates must already be restricted to the eligible set and arrive in
/// scan order; equal scores keep that order.
pub fn rank(
    query: &ItemRecord,
    candidates: &[ItemRecord],
    policy: &MatchPolicy,
) -> Vec<ItemMatch> {
    let mut scored: Vec<(f64, &ItemRecord)> = candidates
        .iter()
        .filter(|c| c.id != query.id && c.has_embedding())
        .map(|c| (cosine_similarity(&query.embedding, &c.embedding), c))
        .filter(|(score, c)| {
            let keep = *score >= policy.threshold();
            if !keep {
                debug!("Candidate {} below threshold ({:.4})", c.id, score);
            }
            keep
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(policy.max_results());

    scored
        .into_iter()
        .map(|(score, c)| ItemMatch {
            score: round_score(score),
            item: c.to_view(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use findback_store::{InMemoryItemStore, ItemDraft, ItemStatus};

    struct Fixture {
        store: Arc<InMemoryItemStore>,
        minutes: i64,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemoryItemStore::new()),
                minutes: 0,
            }
        }

        async fn add(&mut self, id: &str, status: ItemStatus, embedding: Vec<f32>) -> ItemRecord {
            self.add_with(id, status, embedding, true, false).await
        }

        async fn add_with(
            &mut self,
            id: &str,
            status: ItemStatus,
            embedding: Vec<f32>,
            approved: bool,
            resolved: bool,
        ) -> ItemRecord {
            self.minutes += 1;
            let draft = ItemDraft {
                name: id.to_string(),
                status,
                category: "misc".to_string(),
                description: None,
                location: None,
                contact: None,
                image_ref: None,
                image_url: None,
                embedding,
                is_approved: approved,
                is_resolved: resolved,
                created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
                    + Duration::minutes(self.minutes),
            };
            self.store.insert_with_id(id, draft).await
        }

        fn engine(&self, threshold: f64, max: usize) -> MatchEngine {
            MatchEngine::new(self.store.clone(), MatchPolicy::new(threshold, max).unwrap())
        }
    }

    fn ids(outcome: &MatchOutcome) -> Vec<&str> {
        outcome.matches.iter().map(|m| m.id()).collect()
    }

    #[tokio::test]
    async fn test_lost_query_matches_found_only() {
        let mut fx = Fixture::new();
        fx.add("query", ItemStatus::Lost, vec![1.0, 0.0, 0.0]).await;
        fx.add("a", ItemStatus::Found, vec![1.0, 0.0, 0.0]).await;
        fx.add("b", ItemStatus::Found, vec![0.0, 1.0, 0.0]).await;
        fx.add("c", ItemStatus::Lost, vec![1.0, 0.0, 0.0]).await;

        let outcome = fx.engine(0.5, 5).find_matches("query").await.unwrap();

        assert_eq!(outcome.target_status, ItemStatus::Found);
        assert_eq!(ids(&outcome), vec!["a"]);
        assert_eq!(outcome.matches[0].score, 1.0);
        assert!(outcome.note.is_none());
    }

    #[tokio::test]
    async fn test_empty_query_embedding_is_not_an_error() {
        let mut fx = Fixture::new();
        fx.add("query", ItemStatus::Found, Vec::new()).await;
        fx.add("a", ItemStatus::Lost, vec![1.0, 0.0]).await;

        let outcome = fx.engine(0.0, 5).find_matches("query").await.unwrap();

        assert_eq!(outcome.target_status, ItemStatus::Lost);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.note.as_deref(), Some(NO_EMBEDDING_NOTE));
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let fx = Fixture::new();
        let err = fx.engine(0.5, 5).find_matches("missing").await.unwrap_err();
        assert!(matches!(err, FindbackError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ineligible_and_vectorless_candidates_skipped() {
        let mut fx = Fixture::new();
        fx.add("query", ItemStatus::Lost, vec![1.0, 1.0]).await;
        fx.add_with("pending", ItemStatus::Found, vec![1.0, 1.0], false, false).await;
        fx.add_with("closed", ItemStatus::Found, vec![1.0, 1.0], true, true).await;
        fx.add("novector", ItemStatus::Found, Vec::new()).await;
        fx.add("short", ItemStatus::Found, vec![1.0]).await;
        fx.add("ok", ItemStatus::Found, vec![2.0, 2.0]).await;

        let outcome = fx.engine(-1.0, 10).find_matches("query").await.unwrap();

        // mismatched length scores 0 but still clears a -1 threshold
        assert_eq!(ids(&outcome), vec!["ok", "short"]);
        assert_eq!(outcome.matches[1].score, 0.0);
    }

    #[tokio::test]
    async fn test_sorted_descending_and_capped() {
        let mut fx = Fixture::new();
        fx.add("query", ItemStatus::Found, vec![1.0, 0.0]).await;
        fx.add("far", ItemStatus::Lost, vec![0.2, 1.0]).await;
        fx.add("near", ItemStatus::Lost, vec![1.0, 0.1]).await;
        fx.add("mid", ItemStatus::Lost, vec![1.0, 0.6]).await;
        fx.add("exact", ItemStatus::Lost, vec![3.0, 0.0]).await;

        let outcome = fx.engine(0.0, 3).find_matches("query").await.unwrap();

        assert_eq!(ids(&outcome), vec!["exact", "near", "mid"]);
        let scores: Vec<f64> = outcome.matches.iter().map(|m| m.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_equal_scores_keep_scan_order() {
        let mut fx = Fixture::new();
        fx.add("query", ItemStatus::Lost, vec![0.0, 1.0]).await;
        fx.add("oldest", ItemStatus::Found, vec![0.0, 5.0]).await;
        fx.add("middle", ItemStatus::Found, vec![0.0, 2.0]).await;
        fx.add("newest", ItemStatus::Found, vec![0.0, 1.0]).await;

        let engine = fx.engine(0.5, 2);
        let first_run = engine.find_matches("query").await.unwrap();
        let second_run = engine.find_matches("query").await.unwrap();

        // all tie at 1.0: oldest candidates win
        assert_eq!(ids(&first_run), vec!["oldest", "middle"]);
        assert_eq!(ids(&first_run), ids(&second_run));
    }

    #[test]
    fn test_rank_excludes_query_itself() {
        let query = ItemDraft {
            name: "self".to_string(),
            status: ItemStatus::Lost,
            category: "misc".to_string(),
            description: None,
            location: None,
            contact: None,
            image_ref: None,
            image_url: None,
            embedding: vec![1.0, 0.0],
            is_approved: true,
            is_resolved: false,
            created_at: Utc::now(),
        }
        .into_record("q".to_string());

        let matches = rank(&query, &[query.clone()], &MatchPolicy::new(0.0, 5).unwrap());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_scores_are_rounded() {
        let query = ItemDraft {
            name: "q".to_string(),
            status: ItemStatus::Lost,
            category: "misc".to_string(),
            description: None,
            location: None,
            contact: None,
            image_ref: None,
            image_url: None,
            embedding: vec![1.0, 0.0],
            is_approved: true,
            is_resolved: false,
            created_at: Utc::now(),
        }
        .into_record("q".to_string());
        let mut candidate = query.clone();
        candidate.id = "c".to_string();
        candidate.status = ItemStatus::Found;
        candidate.embedding = vec![1.0, 1.0];

        let matches = rank(&query, &[candidate], &MatchPolicy::new(0.0, 5).unwrap());
        // cos 45° = 0.70710678...
        assert_eq!(matches[0].score, 0.7071);
    }
}
