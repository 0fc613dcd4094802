/// Object storage for uploaded audio and artwork
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Audio formats accepted for upload
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav"];

/// Image formats accepted for upload
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Where an uploaded object ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Storage key, e.g. `audio/<uuid>.mp3`
    pub key: String,
    /// Public URL clients fetch the object from
    pub url: String,
}

/// Blob storage the catalog points into
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `folder` with a fresh name
    async fn put(&self, folder: &str, extension: &str, data: Bytes) -> Result<StoredObject>;

    /// Remove an object. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// The key for a URL this store handed out, if it is one of ours
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Objects on the local filesystem, served by the HTTP layer under
/// `public_url`
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    base_path: PathBuf,
    public_url: String,
}

impl LocalObjectStore {
    pub fn new(base_path: PathBuf, public_url: impl Into<String>) -> Self {
        Self {
            base_path,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create the storage directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to a path inside the storage directory
    ///
    /// Keys with `..`, roots or prefixes are rejected (prevent directory
    /// traversal).
    pub fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if key.is_empty() || !safe {
            return Err(ServerError::Unauthorized(
                "Path traversal attempt detected".to_string(),
            ));
        }

        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, folder: &str, extension: &str, data: Bytes) -> Result<StoredObject> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        let key = format!("{}/{}.{}", folder, Uuid::new_v4(), extension);
        let path = self.resolve(&key)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, &data).await?;
        tracing::debug!(key = %key, bytes = data.len(), "stored object");

        Ok(StoredObject {
            url: format!("{}/{}", self.public_url, key),
            key,
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}

/// Lowercased extension of `file_name`, falling back to the one implied by
/// `content_type`
pub fn detect_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    from_name.or_else(|| {
        content_type
            .and_then(mime_guess::get_mime_extensions_str)
            .and_then(|exts| exts.first())
            .map(|ext| (*ext).to_string())
    })
}
