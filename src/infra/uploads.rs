//! Profile image storage on the local filesystem.
//!
//! Files are written under the configured upload directory with a random
//! name; the returned reference is the public path they are served from.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::UPLOADS_ROUTE;
use crate::errors::{AppError, AppResult};

/// An image received in a multipart form, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// File extension to store under. The original name wins, then the
    /// content subtype, then `bin`.
    fn extension(&self) -> String {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str());

        let from_type = self
            .content_type
            .strip_prefix("image/")
            .map(|subtype| subtype.split(['+', ';']).next().unwrap_or(subtype));

        from_name
            .or(from_type)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// Writes uploaded images into a directory served under `/uploads`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an image and return its public reference path.
    pub async fn save(&self, image: UploadedImage) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::internal(format!("Cannot create upload dir: {}", e)))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension());
        tokio::fs::write(self.root.join(&file_name), &image.bytes)
            .await
            .map_err(|e| AppError::internal(format!("Cannot store upload: {}", e)))?;

        tracing::debug!(file = %file_name, size = image.bytes.len(), "Stored profile image");

        Ok(format!("{}/{}", UPLOADS_ROUTE, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(file_name: Option<&str>, content_type: &str) -> UploadedImage {
        UploadedImage {
            file_name: file_name.map(str::to_string),
            content_type: content_type.to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[test]
    fn test_extension_prefers_file_name() {
        assert_eq!(image(Some("me.JPG"), "image/jpeg").extension(), "jpg");
        assert_eq!(image(None, "image/svg+xml").extension(), "svg");
        assert_eq!(image(Some("noext"), "application/x").extension(), "bin");
    }

    #[tokio::test]
    async fn test_save_writes_file_under_root() {
        let root = std::env::temp_dir().join(format!("medibook-store-{}", Uuid::new_v4()));
        let store = ImageStore::new(&root);

        let reference = store.save(image(Some("a.png"), "image/png")).await.unwrap();

        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with(".png"));
        let stored = root.join(reference.trim_start_matches("/uploads/"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
