//! Payment submission and review routes.

use crate::handlers::payments;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn payment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/payments",
            post(payments::submit_payment).get(payments::list_payments),
        )
        .route(
            "/payments/violation/{violation_id}",
            get(payments::list_violation_payments),
        )
        .route(
            "/payments/receipts/{reference}",
            get(payments::get_receipt),
        )
}
