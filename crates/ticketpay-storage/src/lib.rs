//! Ticketpay Storage Library
//!
//! This crate provides the receipt storage abstraction and its implementations.
//! It includes the [`Storage`] trait, a persistent disk backend and an
//! ephemeral backend for stateless deployments.
//!
//! # Reference format
//!
//! Both filesystem backends name stored receipts
//! `receipt-{millisecond timestamp}-{random integer}{.ext}` and hand that name
//! back as the [`FileReference`]. References must not contain `..` or a path
//! separator. Name generation is centralized in the `keys` module so all
//! backends stay consistent.

mod dir;
pub mod disk;
pub mod ephemeral;
pub mod factory;
pub mod keys;
pub mod traits;

// Re-export commonly used types
pub use disk::DiskStorage;
pub use ephemeral::EphemeralStorage;
pub use factory::create_storage;
pub use ticketpay_core::{FileReference, StorageBackend};
pub use traits::{Storage, StorageError, StorageResult};
