//! Flat receipt directory shared by the filesystem backends.

use crate::keys::validate_key;
use crate::traits::{StorageError, StorageResult};
use crate::FileReference;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Clone, Debug)]
pub(crate) struct ReceiptDir {
    base_path: PathBuf,
}

impl ReceiptDir {
    pub(crate) fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub(crate) fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create the directory if needed. Safe to call on every write.
    pub(crate) async fn ensure_exists(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::DirectoryCreation(format!("{}: {}", self.base_path.display(), e))
        })
    }

    /// Convert a reference to a path inside the directory.
    pub(crate) fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if !validate_key(key) {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(key))
    }

    /// Write `data` to `key`, removing whatever was written if any step fails.
    pub(crate) async fn write(&self, key: &str, data: &[u8], sync: bool) -> StorageResult<PathBuf> {
        let path = self.key_to_path(key)?;
        self.ensure_exists().await?;

        if let Err(e) = write_file(&path, data, sync).await {
            if let Err(cleanup_err) = fs::remove_file(&path).await {
                tracing::debug!(
                    error = %cleanup_err,
                    path = %path.display(),
                    "No partial receipt to clean up"
                );
            }
            return Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        Ok(path)
    }

    pub(crate) async fn read(&self, reference: &FileReference) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(reference.as_str())?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(reference.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    pub(crate) async fn exists(&self, reference: &FileReference) -> StorageResult<bool> {
        let path = self.key_to_path(reference.as_str())?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

async fn write_file(path: &Path, data: &[u8], sync: bool) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    if sync {
        file.sync_all().await?;
    }
    Ok(())
}
