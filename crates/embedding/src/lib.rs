//! Findback embedding generation
//!
//! HTTP embedding provider client and vector extraction from provider responses

mod client;
mod extract;
mod generator;
mod provider;
mod types;

pub use client::{build_payload, HttpEmbeddingClient};
pub use extract::{extract_vector, DEFAULT_SEARCH_DEPTH};
pub use generator::EmbeddingGenerator;
pub use provider::EmbeddingProvider;
pub use types::{EmbedRequest, EmbeddingInput};
