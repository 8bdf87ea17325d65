//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    /// `false` when receipts are kept in scratch space that does not survive
    /// a restart.
    pub storage_durable: bool,
}

/// Run an async check with timeout; returns "ready", "timeout", or "not_ready: {error}".
async fn run_check<F, E>(f: F) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(CHECK_TIMEOUT, f).await {
        Ok(Ok(())) => "ready".to_string(),
        Ok(Err(e)) => format!("not_ready: {}", e),
        Err(_) => "timeout".to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is running", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "alive".to_string(),
        environment: state.config.environment().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Database and receipt storage reachable", body = ReadinessResponse),
        (status = 503, description = "A dependency is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = run_check(state.store.ping()).await;

    // Probing a reference that cannot exist still resolves the backend's
    // directory and surfaces I/O errors.
    let probe = ticketpay_core::FileReference::new("receipt-0-0.probe");
    let storage = run_check(async {
        state.storage.exists(&probe).await.map(|_| ())
    })
    .await;

    let ready = database == "ready" && storage == "ready";
    if !ready {
        tracing::error!(database = %database, storage = %storage, "Readiness check failed");
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            database,
            storage,
            storage_durable: state.storage.is_durable(),
        }),
    )
}
