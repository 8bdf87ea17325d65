//! OpenAPI documentation.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorResponse;
use crate::handlers;
use ticketpay_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ticketpay API",
        version = "0.1.0",
        description = "Traffic fine payment submission. Drivers upload a receipt (JPEG, PNG or PDF) for a violation; payments are recorded pending admin approval."
    ),
    paths(
        handlers::payments::submit_payment,
        handlers::payments::list_payments,
        handlers::payments::list_violation_payments,
        handlers::payments::get_receipt,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        models::Payment,
        models::PaymentStatus,
        models::PaymentWithDetails,
        models::SubmitPaymentResponse,
        handlers::payments::PaymentForm,
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
        ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "payments", description = "Payment submission and review"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
