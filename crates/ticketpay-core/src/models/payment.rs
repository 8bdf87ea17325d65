use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

use crate::storage_types::FileReference;

/// Review state of a submitted payment.
///
/// Submissions always start as `Pending`; only the administrative review
/// (outside this service) moves them on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "payment_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Approved => write!(f, "approved"),
            PaymentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A persisted payment submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub payment_id: i64,
    pub violation_id: i64,
    #[schema(value_type = f64)]
    pub payment_amount: Decimal,
    #[schema(value_type = String)]
    pub receipt_file: FileReference,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
}

/// Payment joined with its violation and the violation's owner, for admin review.
///
/// The joined columns are optional: violations need not have an owning user,
/// so the user columns come from a LEFT JOIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentWithDetails {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub payment: Payment,
    pub violation_type: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub fine_amount: Option<Decimal>,
    pub user_name: Option<String>,
    pub driving_license_number: Option<String>,
}

/// Values written by a single payment insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub violation_id: i64,
    pub payment_amount: Decimal,
    pub receipt_file: FileReference,
}

/// Body of a successful `POST /payments`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitPaymentResponse {
    pub message: String,
    #[serde(rename = "paymentId")]
    pub payment_id: i64,
    pub status: PaymentStatus,
}

impl SubmitPaymentResponse {
    pub const PENDING_MESSAGE: &'static str =
        "Payment submitted successfully and is pending admin approval";

    pub fn pending(payment: &Payment) -> Self {
        Self {
            message: Self::PENDING_MESSAGE.to_string(),
            payment_id: payment.payment_id,
            status: payment.status,
        }
    }
}
