use crate::dir::ReceiptDir;
use crate::keys::generate_receipt_name;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::{FileReference, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Storage for stateless execution environments
///
/// Receives receipts already buffered in memory and forwards them to a durable
/// sink when one is attached. Without a sink it falls back to writing into a
/// scratch directory (typically `/tmp/receipts`) that the platform wipes
/// between invocations. In that mode [`Storage::is_durable`] returns `false`
/// and stored receipts may disappear after the request that created them.
#[derive(Clone)]
pub struct EphemeralStorage {
    scratch: ReceiptDir,
    sink: Option<Arc<dyn Storage>>,
}

impl EphemeralStorage {
    /// Scratch-directory mode (non-durable).
    pub fn new(scratch_path: impl Into<PathBuf>) -> Self {
        EphemeralStorage {
            scratch: ReceiptDir::new(scratch_path),
            sink: None,
        }
    }

    /// Forward receipts to `sink` instead of the scratch directory.
    pub fn with_sink(mut self, sink: Arc<dyn Storage>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.base_path()
    }
}

#[async_trait]
impl Storage for EphemeralStorage {
    async fn store(&self, data: Bytes, original_filename: &str) -> StorageResult<FileReference> {
        if data.is_empty() {
            return Err(StorageError::EmptyPayload(original_filename.to_string()));
        }

        if let Some(ref sink) = self.sink {
            return sink.store(data, original_filename).await;
        }

        let key = generate_receipt_name(original_filename);
        let size = data.len();
        let start = std::time::Instant::now();

        // Scratch space is thrown away anyway; skip the fsync.
        let path = self.scratch.write(&key, &data, false).await?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            durable = false,
            "Ephemeral storage upload successful"
        );

        Ok(FileReference::new(key))
    }

    async fn load(&self, reference: &FileReference) -> StorageResult<Vec<u8>> {
        match self.sink {
            Some(ref sink) => sink.load(reference).await,
            None => self.scratch.read(reference).await,
        }
    }

    async fn exists(&self, reference: &FileReference) -> StorageResult<bool> {
        match self.sink {
            Some(ref sink) => sink.exists(reference).await,
            None => self.scratch.exists(reference).await,
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Ephemeral
    }

    fn is_durable(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| sink.is_durable())
    }
}
