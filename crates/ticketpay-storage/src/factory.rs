use crate::{DiskStorage, EphemeralStorage, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use ticketpay_core::Config;

/// Create the receipt storage backend selected by configuration.
///
/// Called once at startup; the result is injected into the upload gateway.
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    build_storage(
        config.storage_backend(),
        config.receipt_upload_dir(),
        config.receipt_scratch_dir(),
    )
}

pub(crate) fn build_storage(
    backend: StorageBackend,
    upload_dir: &str,
    scratch_dir: &str,
) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        StorageBackend::Disk => {
            let storage = DiskStorage::new(upload_dir);
            tracing::info!(
                path = %storage.base_path().display(),
                "Using persistent disk storage for receipts"
            );
            Ok(Arc::new(storage))
        }

        StorageBackend::Ephemeral => {
            let storage = EphemeralStorage::new(scratch_dir);
            tracing::warn!(
                path = %storage.scratch_path().display(),
                "Using ephemeral scratch storage for receipts; stored receipts are not durable \
                 and may be lost between invocations"
            );
            Ok(Arc::new(storage))
        }

        StorageBackend::Remote => Err(StorageError::ConfigError(
            "Remote receipt storage backend not yet implemented".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_disk_storage() {
        let storage =
            build_storage(StorageBackend::Disk, "uploads/receipts", "/tmp/receipts").unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Disk);
        assert!(storage.is_durable());
    }

    #[test]
    fn test_build_ephemeral_storage() {
        let storage =
            build_storage(StorageBackend::Ephemeral, "uploads/receipts", "/tmp/receipts").unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Ephemeral);
        assert!(!storage.is_durable());
    }

    #[test]
    fn test_remote_storage_is_a_config_error() {
        let result = build_storage(StorageBackend::Remote, "uploads/receipts", "/tmp/receipts");
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
