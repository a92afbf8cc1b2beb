use crate::error::FindbackError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Findback application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database base path
    pub db_base_path: PathBuf,

    /// Directory where uploaded images are stored
    pub upload_dir: PathBuf,

    /// Item records file (JSON document store)
    pub items_path: PathBuf,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Text-only embedding endpoint
    pub embedding_text_url: String,

    /// Text + image (fusion) embedding endpoint
    pub embedding_fusion_url: String,

    /// Bearer credential for the embedding provider
    #[serde(skip_serializing)]
    pub embedding_api_key: Option<String>,

    /// Timeout for a single embedding request, in seconds
    pub embedding_timeout_secs: u64,

    /// Maximum depth searched for a vector inside a provider response
    pub embedding_search_depth: usize,

    /// Minimum cosine similarity for a candidate to be reported
    pub similarity_threshold: f64,

    /// Maximum number of matches returned per request
    pub max_matches: usize,

    /// Externally reachable base URL, used for signed blob links
    pub public_base_url: String,

    /// Prefix of the internal URI handed to the embedding provider
    pub blob_uri_prefix: String,

    /// Lifetime of signed blob URLs, in seconds
    pub signed_url_ttl_secs: u64,

    /// Secret used to sign blob URLs
    #[serde(skip_serializing)]
    pub blob_signing_secret: String,

    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_base_path: PathBuf::from("./db"),
            upload_dir: PathBuf::from("./db/uploads"),
            items_path: PathBuf::from("./db/items.json"),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./db/log"),
            log_level: "info".to_string(),
            embedding_text_url: "http://localhost:9000/v1/embed/text".to_string(),
            embedding_fusion_url: "http://localhost:9000/v1/embed/multimodal".to_string(),
            embedding_api_key: None,
            embedding_timeout_secs: 30,
            embedding_search_depth: 5,
            similarity_threshold: 0.5,
            max_matches: 5,
            public_base_url: "http://localhost:8080".to_string(),
            blob_uri_prefix: "blob://items".to_string(),
            signed_url_ttl_secs: 7 * 24 * 60 * 60,
            blob_signing_secret: "change-me".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, FindbackError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let db_base_path =
            Self::get_env_path("DB_BASE_PATH").unwrap_or(defaults.db_base_path);

        let config = Self {
            upload_dir: Self::get_env_path("UPLOAD_DIR")
                .unwrap_or_else(|| db_base_path.join("uploads")),
            items_path: Self::get_env_path("ITEMS_PATH")
                .unwrap_or_else(|| db_base_path.join("items.json")),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or_else(|| db_base_path.join("log")),
            db_base_path,
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            embedding_text_url: std::env::var("EMBEDDING_TEXT_URL")
                .unwrap_or(defaults.embedding_text_url),
            embedding_fusion_url: std::env::var("EMBEDDING_FUSION_URL")
                .unwrap_or(defaults.embedding_fusion_url),
            embedding_api_key: std::env::var("EMBEDDING_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            embedding_timeout_secs: Self::get_env_parsed("EMBEDDING_TIMEOUT_SECS")
                .unwrap_or(defaults.embedding_timeout_secs),
            embedding_search_depth: Self::get_env_parsed("EMBEDDING_SEARCH_DEPTH")
                .unwrap_or(defaults.embedding_search_depth),
            similarity_threshold: Self::get_env_parsed("SIMILARITY_THRESHOLD")
                .unwrap_or(defaults.similarity_threshold),
            max_matches: Self::get_env_parsed("MAX_MATCHES").unwrap_or(defaults.max_matches),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or(defaults.public_base_url),
            blob_uri_prefix: std::env::var("BLOB_URI_PREFIX")
                .unwrap_or(defaults.blob_uri_prefix),
            signed_url_ttl_secs: Self::get_env_parsed("SIGNED_URL_TTL_SECS")
                .unwrap_or(defaults.signed_url_ttl_secs),
            blob_signing_secret: std::env::var("BLOB_SIGNING_SECRET")
                .unwrap_or(defaults.blob_signing_secret),
            max_upload_bytes: Self::get_env_parsed("MAX_UPLOAD_BYTES")
                .unwrap_or(defaults.max_upload_bytes),
        };

        config.validate()?;

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Parse an environment variable, ignoring missing or malformed values
    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), FindbackError> {
        let dirs = vec![&self.db_base_path, &self.upload_dir, &self.log_dir];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    FindbackError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), FindbackError> {
        for (name, url) in [
            ("Embedding text URL", &self.embedding_text_url),
            ("Embedding fusion URL", &self.embedding_fusion_url),
            ("Public base URL", &self.public_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FindbackError::config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.server_port == 0 {
            return Err(FindbackError::config("Server port cannot be 0"));
        }

        if !self.similarity_threshold.is_finite()
            || !(-1.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(FindbackError::config(
                "Similarity threshold must be between -1.0 and 1.0",
            ));
        }

        if self.max_matches == 0 {
            return Err(FindbackError::config("Max matches must be at least 1"));
        }

        if self.embedding_timeout_secs == 0 {
            return Err(FindbackError::config("Embedding timeout cannot be 0"));
        }

        if self.blob_signing_secret.is_empty() {
            return Err(FindbackError::config("Blob signing secret cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.max_matches, 5);
        assert_eq!(config.embedding_search_depth, 5);
        assert!((config.similarity_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.embedding_text_url = "ftp://provider".to_string();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.similarity_threshold = 1.5;
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.max_matches = 0;
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.blob_signing_secret = String::new();
        assert!(invalid_config.validate().is_err());
    }

    #[test]
    fn test_secrets_not_serialized() {
        let mut config = AppConfig::default();
        config.embedding_api_key = Some("secret-token".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(!json.contains("change-me"));
    }
}
