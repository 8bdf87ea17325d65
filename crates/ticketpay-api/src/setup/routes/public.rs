//! Unauthenticated routes: health probes and the OpenAPI document.

use crate::constants::OPENAPI_JSON_PATH;
use crate::handlers::health;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use std::sync::Arc;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            OPENAPI_JSON_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}
