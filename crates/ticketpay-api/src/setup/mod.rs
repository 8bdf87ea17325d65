//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtVerifier;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use ticketpay_core::Config;
use ticketpay_db::create_payment_store;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment());
    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config)?;

    let state = Arc::new(AppState::new(
        config.clone(),
        create_payment_store(pool),
        storage,
        Arc::new(JwtVerifier::new(config.jwt_secret())),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
