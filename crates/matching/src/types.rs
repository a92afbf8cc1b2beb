use findback_common::{AppConfig, FindbackError, Result};
use findback_store::{ItemStatus, ItemView};
use serde::Serialize;

/// Filtering policy applied to scored candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Minimum score to keep a candidate (inclusive)
    threshold: f64,

    /// Maximum number of matches returned
    max_results: usize,
}

impl MatchPolicy {
    pub fn new(threshold: f64, max_results: usize) -> Result<Self> {
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            return Err(FindbackError::config(format!(
                "similarity threshold {} is outside [-1, 1]",
                threshold
            )));
        }
        if max_results == 0 {
            return Err(FindbackError::config("max results must be at least 1"));
        }
        Ok(Self {
            threshold,
            max_results,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.similarity_threshold, config.max_matches)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            max_results: 5,
        }
    }
}

/// A ranked candidate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMatch {
    /// Similarity rounded to 4 decimals
    pub score: f64,

    #[serde(flatten)]
    pub item: ItemView,
}

impl ItemMatch {
    pub fn id(&self) -> &str {
        &self.item.id
    }
}

/// Result of a match request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    /// Status the candidates were drawn from
    pub target_status: ItemStatus,

    /// Best matches first
    pub matches: Vec<ItemMatch>,

    /// Why the list is empty, when it is for a known reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
