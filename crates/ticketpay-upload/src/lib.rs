//! Receipt ingestion
//!
//! [`UploadGateway`] is the single path through which receipt bytes reach a
//! storage backend: it validates type and size, then delegates to whichever
//! [`ticketpay_storage::Storage`] was selected at startup.

pub mod gateway;
pub mod validator;

pub use gateway::{UploadError, UploadGateway, UploadedFile, RECEIPT_REQUIRED_MESSAGE};
pub use validator::{
    ReceiptValidator, ValidationError, MAX_RECEIPT_SIZE_BYTES, RECEIPT_CONTENT_TYPES,
    RECEIPT_EXTENSIONS,
};
