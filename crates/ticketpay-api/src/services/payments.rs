//! Payment submission workflow and read-side queries.

use crate::auth::AuthContext;
use crate::utils::upload::content_type_for_reference;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use ticketpay_core::models::{NewPayment, Payment, PaymentWithDetails};
use ticketpay_core::{AppError, FileReference};
use ticketpay_db::PaymentStore;
use ticketpay_storage::StorageError;
use ticketpay_upload::{UploadGateway, UploadedFile};

/// Largest amount a NUMERIC(10, 2) column holds.
fn max_payment_amount() -> Decimal {
    Decimal::new(99_999_999_99, 2)
}

/// Raw fields of one `POST /payments` request, as received.
#[derive(Debug, Default)]
pub struct PaymentSubmission {
    pub violation_id: Option<String>,
    pub payment_amount: Option<String>,
    pub receipt: Option<UploadedFile>,
}

/// Stored receipt bytes with the media type to serve them under.
#[derive(Debug)]
pub struct ReceiptContent {
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Clone)]
pub struct PaymentService {
    gateway: UploadGateway,
    store: Arc<dyn PaymentStore>,
}

impl PaymentService {
    pub fn new(gateway: UploadGateway, store: Arc<dyn PaymentStore>) -> Self {
        Self { gateway, store }
    }

    /// Record one payment submission.
    ///
    /// Steps run in order and stop at the first failure: credential check,
    /// field checks, receipt ingestion, payment insert. Nothing is written
    /// before the receipt passes validation, and no payment row exists without
    /// a stored receipt. Flagging the violation afterwards is best-effort.
    #[tracing::instrument(skip(self, auth, submission), fields(violation_id = tracing::field::Empty))]
    pub async fn submit(
        &self,
        auth: &AuthContext,
        submission: PaymentSubmission,
    ) -> Result<Payment, AppError> {
        let principal = auth.require()?;

        let violation_id = parse_violation_id(submission.violation_id.as_deref())?;
        let payment_amount = parse_payment_amount(submission.payment_amount.as_deref())?;
        tracing::Span::current().record("violation_id", violation_id);

        let receipt_file = self.gateway.ingest(submission.receipt).await?;

        let payment = self
            .store
            .create_payment(NewPayment {
                violation_id,
                payment_amount,
                receipt_file: receipt_file.clone(),
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    receipt_file = %receipt_file,
                    "Payment insert failed; stored receipt is not referenced by any payment"
                );
            })?;

        tracing::info!(
            payment_id = payment.payment_id,
            subject = %principal.subject,
            amount = %payment.payment_amount,
            receipt_file = %payment.receipt_file,
            "Payment submitted"
        );

        self.flag_violation(violation_id).await;

        Ok(payment)
    }

    /// Set the violation's submitted flag. Errors are logged, never returned:
    /// the payment is already recorded and stays recorded.
    async fn flag_violation(&self, violation_id: i64) {
        match self.store.mark_violation_payment_submitted(violation_id).await {
            Ok(true) => {
                tracing::debug!(violation_id, "Violation marked as payment submitted");
            }
            Ok(false) => {
                tracing::warn!(violation_id, "No violation row to mark as payment submitted");
            }
            Err(e) => {
                tracing::error!(
                    violation_id,
                    error = %e,
                    "Failed to mark violation as payment submitted"
                );
            }
        }
    }

    /// All payments with violation and submitter details, newest first.
    pub async fn list_payments(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<PaymentWithDetails>, AppError> {
        auth.require()?;
        self.store.list_payments_with_details().await
    }

    /// Payments recorded against `violation_id`; empty when there are none.
    pub async fn list_payments_for_violation(
        &self,
        auth: &AuthContext,
        violation_id: i64,
    ) -> Result<Vec<Payment>, AppError> {
        auth.require()?;
        self.store.list_payments_for_violation(violation_id).await
    }

    /// Resolve a receipt reference that belongs to a recorded payment.
    pub async fn load_receipt(
        &self,
        auth: &AuthContext,
        reference: &FileReference,
    ) -> Result<ReceiptContent, AppError> {
        auth.require()?;

        if self.store.find_payment_by_receipt(reference).await?.is_none() {
            return Err(AppError::NotFound(format!("Receipt not found: {}", reference)));
        }

        let data = self
            .gateway
            .storage()
            .load(reference)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(key) => {
                    AppError::NotFound(format!("Receipt not found: {}", key))
                }
                StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
                other => AppError::Storage(other.to_string()),
            })?;

        Ok(ReceiptContent {
            data,
            content_type: content_type_for_reference(reference),
        })
    }
}

fn parse_violation_id(raw: Option<&str>) -> Result<i64, AppError> {
    let raw = required_field(raw, "violation_id")?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidInput(
            "violation_id must be a positive integer".to_string(),
        )),
    }
}

fn parse_payment_amount(raw: Option<&str>) -> Result<Decimal, AppError> {
    let raw = required_field(raw, "payment_amount")?;
    let amount = Decimal::from_str(raw).map_err(|_| {
        AppError::InvalidInput("payment_amount must be a decimal number".to_string())
    })?;

    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "payment_amount must be greater than zero".to_string(),
        ));
    }
    if amount.normalize().scale() > 2 {
        return Err(AppError::InvalidInput(
            "payment_amount must have at most two decimal places".to_string(),
        ));
    }
    if amount > max_payment_amount() {
        return Err(AppError::InvalidInput(
            "payment_amount is too large".to_string(),
        ));
    }

    Ok(amount)
}

fn required_field<'a>(raw: Option<&'a str>, name: &str) -> Result<&'a str, AppError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", name)))
}
