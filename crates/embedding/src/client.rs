use async_trait::async_trait;
use findback_common::{AppConfig, FindbackError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::provider::EmbeddingProvider;
use crate::types::{EmbedRequest, FusionInstance, ImageSource, PredictPayload, TextInstance};

/// HTTP embedding provider with separate text and fusion endpoints
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    text_url: String,
    fusion_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpEmbeddingClient {
    /// Create new embedding client
    pub fn new(
        text_url: impl Into<String>,
        fusion_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let text_url = text_url.into();
        let fusion_url = fusion_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FindbackError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Embedding client initialized: text={}, fusion={}, timeout={:?}",
            text_url, fusion_url, timeout
        );
        Ok(Self {
            text_url,
            fusion_url,
            api_key,
            client,
        })
    }

    /// Create client from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.embedding_text_url.clone(),
            config.embedding_fusion_url.clone(),
            config.embedding_api_key.clone(),
            Duration::from_secs(config.embedding_timeout_secs),
        )
    }

    /// Endpoint for a request variant
    pub fn endpoint(&self, request: &EmbedRequest) -> &str {
        match request {
            EmbedRequest::Text { .. } => &self.text_url,
            EmbedRequest::Fusion { .. } => &self.fusion_url,
        }
    }
}

/// Build the JSON body for a request variant
pub fn build_payload(request: &EmbedRequest) -> Result<Value> {
    let payload = match request {
        EmbedRequest::Text { text } => serde_json::to_value(PredictPayload {
            instances: vec![TextInstance { content: text }],
        })?,
        EmbedRequest::Fusion { text, image_ref } => serde_json::to_value(PredictPayload {
            instances: vec![FusionInstance {
                text: text.as_deref(),
                image: ImageSource { gcs_uri: image_ref },
            }],
        })?,
    };
    Ok(payload)
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    /// Single attempt; the caller decides what a failure means
    async fn predict(&self, request: &EmbedRequest) -> Result<Value> {
        let url = self.endpoint(request);
        let payload = build_payload(request)?;

        debug!("Sending {} embedding request to {}", request.kind(), url);

        let mut builder = self.client.post(url).json(&payload);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            FindbackError::network(format!("Failed to send embedding request: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FindbackError::embedding(format!(
                "Embedding provider returned {}",
                status
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            FindbackError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        Ok(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}
