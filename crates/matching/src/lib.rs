//! Findback match engine
//!
//! Cosine-similarity ranking of lost/found item embeddings

mod engine;
mod similarity;
mod types;

pub use engine::{rank, MatchEngine, NO_EMBEDDING_NOTE};
pub use similarity::{cosine_similarity, round_score};
pub use types::{ItemMatch, MatchOutcome, MatchPolicy};
