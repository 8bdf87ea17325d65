use crate::validator::{ReceiptValidator, ValidationError};
use bytes::Bytes;
use std::sync::Arc;
use ticketpay_core::{AppError, FileReference};
use ticketpay_storage::{Storage, StorageError};

/// Message returned when a submission carries no receipt part.
pub const RECEIPT_REQUIRED_MESSAGE: &str = "Receipt file is required";

/// A receipt part pulled from a multipart request, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub original_filename: String,
    pub content_type: String,
}

impl UploadedFile {
    pub fn new(
        data: impl Into<Bytes>,
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            original_filename: original_filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Receipt file is required")]
    Missing,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Receipt storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Missing => AppError::BadRequest(RECEIPT_REQUIRED_MESSAGE.to_string()),
            UploadError::Invalid(ValidationError::FileTooLarge { max, .. }) => {
                AppError::FileTooLarge(format!(
                    "File size exceeds maximum allowed size of {} MB",
                    max / (1024 * 1024)
                ))
            }
            UploadError::Invalid(ValidationError::EmptyFile) => {
                AppError::InvalidInput("Receipt file is empty".to_string())
            }
            UploadError::Invalid(e) => AppError::InvalidInput(e.to_string()),
            UploadError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

/// Validates receipts and hands accepted bytes to the configured backend.
#[derive(Clone)]
pub struct UploadGateway {
    validator: ReceiptValidator,
    storage: Arc<dyn Storage>,
}

impl UploadGateway {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            validator: ReceiptValidator::default(),
            storage,
        }
    }

    pub fn with_validator(mut self, validator: ReceiptValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Accept or reject a receipt.
    ///
    /// Nothing is written unless every validation check passes. On success the
    /// returned reference resolves to exactly the bytes that were supplied.
    #[tracing::instrument(
        skip(self, file),
        fields(
            filename = file.as_ref().map(|f| f.original_filename.as_str()).unwrap_or(""),
            size_bytes = file.as_ref().map(|f| f.size()).unwrap_or(0),
            backend = %self.storage.backend_type(),
        )
    )]
    pub async fn ingest(&self, file: Option<UploadedFile>) -> Result<FileReference, UploadError> {
        let file = file.ok_or(UploadError::Missing)?;

        if let Err(e) =
            self.validator
                .validate(file.size(), &file.original_filename, &file.content_type)
        {
            tracing::debug!(
                content_type = %file.content_type,
                error = %e,
                "Receipt rejected by validation"
            );
            return Err(e.into());
        }

        let reference = self
            .storage
            .store(file.data, &file.original_filename)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to store receipt");
                UploadError::Storage(e)
            })?;

        tracing::info!(reference = %reference, "Receipt stored");
        Ok(reference)
    }
}
