/// Findback error types
#[derive(Debug, thiserror::Error)]
pub enum FindbackError {
    /// Invalid input (rejected before any side effect)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Access to a resource was refused
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Embedding provider returned an unusable response
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Document or blob store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FindbackError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create forbidden error
    pub fn forbidden<S: Into<String>>(msg: S) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create embedding provider error
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create store error
    pub fn store<S: Into<String>>(msg: S) -> Self {
        Self::Store(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// HTTP response mapping, consumed by the server's ResponseError impl
impl FindbackError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Embedding(_) => 502,
            Self::Network(_) => 503,
            Self::Store(_) => 500,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }

    /// Whether the error is caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FindbackError::invalid_input("name").status_code(), 400);
        assert_eq!(FindbackError::not_found("item").status_code(), 404);
        assert_eq!(FindbackError::forbidden("sig").status_code(), 403);
        assert_eq!(FindbackError::store("down").status_code(), 500);
        assert_eq!(FindbackError::network("timeout").status_code(), 503);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(FindbackError::invalid_input("x").is_client_error());
        assert!(FindbackError::not_found("x").is_client_error());
        assert!(!FindbackError::store("x").is_client_error());
        assert!(!FindbackError::embedding("x").is_client_error());
    }

    #[test]
    fn test_display_includes_message() {
        let err = FindbackError::not_found("item abc");
        assert_eq!(err.to_string(), "Not found: item abc");
    }
}
