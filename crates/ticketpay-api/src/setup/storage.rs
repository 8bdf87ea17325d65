//! Receipt storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use ticketpay_core::Config;
use ticketpay_storage::{create_storage, Storage};

/// Build the receipt storage backend once for the whole process.
pub fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config).context("Failed to initialize receipt storage")?;

    tracing::info!(
        backend = %storage.backend_type(),
        durable = storage.is_durable(),
        "Receipt storage initialized"
    );

    Ok(storage)
}
