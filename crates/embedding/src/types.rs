use serde::Serialize;

/// What an item offers for embedding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingInput {
    /// Free-text description
    pub text: Option<String>,

    /// Internal reference to an uploaded image
    pub image_ref: Option<String>,
}

impl EmbeddingInput {
    /// Build an input, dropping blank values
    pub fn new(text: Option<String>, image_ref: Option<String>) -> Self {
        Self {
            text: non_blank(text),
            image_ref: non_blank(image_ref),
        }
    }

    /// Text-only input
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Some(text.into()), None)
    }

    /// True when there is nothing to embed
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.image_ref.is_none()
    }

    /// Route to the provider variant: fusion when an image is present
    pub fn to_request(&self) -> Option<EmbedRequest> {
        match (&self.text, &self.image_ref) {
            (_, Some(image_ref)) => Some(EmbedRequest::Fusion {
                text: self.text.clone(),
                image_ref: image_ref.clone(),
            }),
            (Some(text), None) => Some(EmbedRequest::Text { text: text.clone() }),
            (None, None) => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Request sent to an embedding provider
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedRequest {
    /// Text-only embedding
    Text { text: String },

    /// Combined text + image embedding
    Fusion {
        text: Option<String>,
        image_ref: String,
    },
}

impl EmbedRequest {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Fusion { .. } => "fusion",
        }
    }
}

/// Prediction payload: `{"instances": [...]}`
#[derive(Debug, Serialize)]
pub struct PredictPayload<T: Serialize> {
    pub instances: Vec<T>,
}

/// Text-only instance
#[derive(Debug, Serialize)]
pub struct TextInstance<'a> {
    pub content: &'a str,
}

/// Fusion instance
#[derive(Debug, Serialize)]
pub struct FusionInstance<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,

    pub image: ImageSource<'a>,
}

/// Image reference understood by the provider
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource<'a> {
    pub gcs_uri: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_dropped() {
        let input = EmbeddingInput::new(Some("   ".to_string()), Some(String::new()));
        assert!(input.is_empty());
        assert_eq!(input.to_request(), None);
    }

    #[test]
    fn test_image_routes_to_fusion() {
        let input = EmbeddingInput::new(
            Some("red umbrella".to_string()),
            Some("blob://items/a.jpg".to_string()),
        );
        assert_eq!(
            input.to_request(),
            Some(EmbedRequest::Fusion {
                text: Some("red umbrella".to_string()),
                image_ref: "blob://items/a.jpg".to_string(),
            })
        );

        let image_only = EmbeddingInput::new(None, Some("blob://items/b.png".to_string()));
        assert_eq!(image_only.to_request().map(|r| r.kind()), Some("fusion"));
    }

    #[test]
    fn test_text_routes_to_text() {
        let input = EmbeddingInput::text("black wallet");
        assert_eq!(
            input.to_request(),
            Some(EmbedRequest::Text {
                text: "black wallet".to_string()
            })
        );
    }
}
