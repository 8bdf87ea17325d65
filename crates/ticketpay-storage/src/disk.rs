use crate::dir::ReceiptDir;
use crate::keys::generate_receipt_name;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::{FileReference, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Persistent local filesystem storage
///
/// Receipts are written flat into one directory, which is created the first
/// time a receipt is stored.
#[derive(Clone, Debug)]
pub struct DiskStorage {
    dir: ReceiptDir,
}

impl DiskStorage {
    /// Create a new DiskStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Receipt directory (e.g., "uploads/receipts"). Not touched until the first store.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        DiskStorage {
            dir: ReceiptDir::new(base_path),
        }
    }

    pub fn base_path(&self) -> &Path {
        self.dir.base_path()
    }
}

#[async_trait]
impl Storage for DiskStorage {
    async fn store(&self, data: Bytes, original_filename: &str) -> StorageResult<FileReference> {
        if data.is_empty() {
            return Err(StorageError::EmptyPayload(original_filename.to_string()));
        }

        let key = generate_receipt_name(original_filename);
        let size = data.len();
        let start = std::time::Instant::now();

        let path = self.dir.write(&key, &data, true).await?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Disk storage upload successful"
        );

        Ok(FileReference::new(key))
    }

    async fn load(&self, reference: &FileReference) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();
        let data = self.dir.read(reference).await?;

        tracing::debug!(
            key = %reference,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Disk storage download successful"
        );

        Ok(data)
    }

    async fn exists(&self, reference: &FileReference) -> StorageResult<bool> {
        self.dir.exists(reference).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Disk
    }

    fn is_durable(&self) -> bool {
        true
    }
}
