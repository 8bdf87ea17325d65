//! Ticketpay Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by the storage, upload, database and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{FileReference, StorageBackend};
