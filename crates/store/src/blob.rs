use async_trait::async_trait;
use chrono::{DateTime, Utc};
use findback_common::{AppConfig, FindbackError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Result of storing an uploaded file
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    /// Blob name inside the store
    pub name: String,

    /// Stable internal URI, usable as embedding input
    pub internal_uri: String,

    /// Time-limited read URL for display
    pub signed_url: String,
}

/// Blob store for uploaded item images
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        original_name: Option<&str>,
    ) -> Result<StoredBlob>;

    /// Remove a stored blob; removing a missing blob is not an error
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Blob store on the local filesystem with signed read URLs
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
    uri_prefix: String,
    secret: String,
    ttl_secs: u64,
    max_bytes: usize,
}

impl LocalBlobStore {
    pub fn new(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        uri_prefix: impl Into<String>,
        secret: impl Into<String>,
        ttl_secs: u64,
        max_bytes: usize,
    ) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            uri_prefix: uri_prefix.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
            ttl_secs,
            max_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.upload_dir.clone(),
            config.public_base_url.clone(),
            config.blob_uri_prefix.clone(),
            config.blob_signing_secret.clone(),
            config.signed_url_ttl_secs,
            config.max_upload_bytes,
        )
    }

    /// Filesystem path of a blob, or `None` if the name is not a plain file name
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let is_plain = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !name.starts_with('.');
        is_plain.then(|| self.root.join(name))
    }

    /// Signed URL valid until `now + ttl`
    pub fn sign_url(&self, name: &str, now: DateTime<Utc>) -> Result<String> {
        let expires = now.timestamp() + self.ttl_secs as i64;
        Ok(format!(
            "{}/blobs/{}?expires={}&signature={}",
            self.public_base_url,
            name,
            expires,
            self.signature(name, expires)?
        ))
    }

    /// Check a signed URL's parameters
    pub fn verify(
        &self,
        name: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if now.timestamp() > expires {
            return Err(FindbackError::forbidden("link expired"));
        }
        let provided =
            hex::decode(signature).map_err(|_| FindbackError::forbidden("invalid signature"))?;
        self.mac(name, expires)?
            .verify_slice(&provided)
            .map_err(|_| FindbackError::forbidden("invalid signature"))
    }

    fn signature(&self, name: &str, expires: i64) -> Result<String> {
        Ok(hex::encode(self.mac(name, expires)?.finalize().into_bytes()))
    }

    fn mac(&self, name: &str, expires: i64) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| FindbackError::config(format!("Invalid blob signing key: {}", e)))?;
        mac.update(name.as_bytes());
        mac.update(b":");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }
}

/// File extension for an image upload
fn extension_for(content_type: &str, original_name: Option<&str>) -> String {
    let from_type = match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    };
    from_type
        .map(str::to_string)
        .or_else(|| {
            original_name
                .and_then(|n| Path::new(n).extension())
                .and_then(|e| e.to_str())
                .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
                .map(|e| e.to_lowercase())
        })
        .unwrap_or_else(|| "bin".to_string())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        original_name: Option<&str>,
    ) -> Result<StoredBlob> {
        if !content_type.starts_with("image/") {
            return Err(FindbackError::invalid_input(format!(
                "only image uploads are accepted, got '{}'",
                content_type
            )));
        }
        if bytes.is_empty() {
            return Err(FindbackError::invalid_input("uploaded file is empty"));
        }
        if bytes.len() > self.max_bytes {
            return Err(FindbackError::invalid_input(format!(
                "uploaded file exceeds {} bytes",
                self.max_bytes
            )));
        }

        let name = format!(
            "{}.{}",
            Uuid::new_v4(),
            extension_for(content_type, original_name)
        );
        let path = self.root.join(&name);

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            FindbackError::store(format!("Failed to create {}: {}", self.root.display(), e))
        })?;
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            FindbackError::store(format!("Failed to write blob {}: {}", path.display(), e))
        })?;

        info!("Stored blob {} ({} bytes, {})", name, bytes.len(), content_type);

        Ok(StoredBlob {
            internal_uri: format!("{}/{}", self.uri_prefix, name),
            signed_url: self.sign_url(&name, Utc::now())?,
            name,
        })
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name).ok_or_else(|| {
            FindbackError::invalid_input(format!("invalid blob name '{}'", name))
        })?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted blob {}", name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FindbackError::store(format!(
                "Failed to delete blob {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
