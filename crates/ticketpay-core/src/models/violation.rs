use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A recorded traffic violation.
///
/// Violations are owned elsewhere; this service only reads them for the admin
/// listing and sets `payment_submitted` after a payment is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Violation {
    pub violation_id: i64,
    pub user_id: Option<i64>,
    pub violation_type: String,
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
    pub payment_submitted: bool,
}
