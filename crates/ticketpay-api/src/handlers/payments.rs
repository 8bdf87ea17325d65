use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_payment_form;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use ticketpay_core::models::{Payment, PaymentWithDetails, SubmitPaymentResponse};
use ticketpay_core::FileReference;
use ticketpay_upload::UploadError;
use utoipa::ToSchema;

/// Multipart body of `POST /payments`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct PaymentForm {
    /// Violation being paid
    #[schema(example = "7")]
    violation_id: String,
    /// Amount paid, at most two decimal places
    #[schema(example = "50.00")]
    payment_amount: String,
    /// JPEG, PNG or PDF receipt, max 5 MB
    #[schema(value_type = String, format = Binary)]
    receipt: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body(content = PaymentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Payment recorded, pending admin approval", body = SubmitPaymentResponse),
        (status = 400, description = "Missing receipt, invalid receipt or invalid fields", body = ErrorResponse),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid bearer token", body = ErrorResponse),
        (status = 500, description = "Record store error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_payment(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Fail closed before reading the body.
    auth.require()?;

    // A body that is not multipart cannot carry a receipt.
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(MultipartRejection::InvalidBoundary(_)) => {
            return Err(UploadError::Missing.into());
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let submission = extract_payment_form(multipart).await?;
    let payment = state.payments.submit(&auth, submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitPaymentResponse::pending(&payment)),
    ))
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    responses(
        (status = 200, description = "All payments, newest first", body = Vec<PaymentWithDetails>),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid bearer token", body = ErrorResponse),
        (status = 500, description = "Record store error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> Result<Json<Vec<PaymentWithDetails>>, HttpAppError> {
    let payments = state.payments.list_payments(&auth).await?;
    Ok(Json(payments))
}

#[utoipa::path(
    get,
    path = "/payments/violation/{violation_id}",
    tag = "payments",
    params(
        ("violation_id" = i64, Path, description = "Violation ID")
    ),
    responses(
        (status = 200, description = "Payments for the violation, possibly empty", body = Vec<Payment>),
        (status = 400, description = "Invalid violation ID", body = ErrorResponse),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid bearer token", body = ErrorResponse),
        (status = 500, description = "Record store error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_violation_payments(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(violation_id): Path<i64>,
) -> Result<Json<Vec<Payment>>, HttpAppError> {
    let payments = state
        .payments
        .list_payments_for_violation(&auth, violation_id)
        .await?;
    Ok(Json(payments))
}

#[utoipa::path(
    get,
    path = "/payments/receipts/{reference}",
    tag = "payments",
    params(
        ("reference" = String, Path, description = "Receipt reference returned in a payment's receipt_file")
    ),
    responses(
        (status = 200, description = "Receipt bytes", content_type = "application/octet-stream"),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid bearer token", body = ErrorResponse),
        (status = 404, description = "Receipt not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_receipt(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(reference): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let reference = FileReference::new(reference);
    let receipt = state.payments.load_receipt(&auth, &reference).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, receipt.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", reference),
            ),
        ],
        receipt.data,
    ))
}
