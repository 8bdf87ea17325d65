//! Storage abstraction trait
//!
//! This module defines the Storage trait that every receipt backend implements.

use crate::{FileReference, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No bytes supplied for {0}")]
    EmptyPayload(String),

    #[error("Failed to create storage directory: {0}")]
    DirectoryCreation(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Receipt storage abstraction
///
/// Turns raw upload bytes plus the client's original filename into a
/// [`FileReference`] that can later be resolved back to the same bytes. The
/// upload gateway holds one `Arc<dyn Storage>` chosen at startup and never
/// inspects which implementation it got.
///
/// A remote implementation may return a URL as the reference; callers treat
/// the value as opaque.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under a freshly generated name and return its reference.
    ///
    /// Fails with [`StorageError::EmptyPayload`] when `data` is empty. A failed
    /// store never yields a reference.
    async fn store(&self, data: Bytes, original_filename: &str) -> StorageResult<FileReference>;

    /// Read back the bytes stored under `reference`.
    async fn load(&self, reference: &FileReference) -> StorageResult<Vec<u8>>;

    /// Check whether `reference` currently resolves to stored bytes.
    async fn exists(&self, reference: &FileReference) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Whether stored receipts survive a process restart.
    fn is_durable(&self) -> bool;
}
