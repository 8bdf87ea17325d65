use std::sync::Arc;

use sqlx::PgPool;
use ticketpay_core::models::{NewPayment, Payment, PaymentWithDetails, Violation};
use ticketpay_core::{AppError, FileReference};

/// Trait for payment record store operations
///
/// Payment creation and the violation flag update are separate calls with no
/// shared transaction; callers decide how to handle a failed flag update.
#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert one payment row and return it with its generated id, timestamp
    /// and default `pending` status.
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, AppError>;

    /// Set `payment_submitted` on the violation. Returns `false` when no
    /// violation with that id exists.
    async fn mark_violation_payment_submitted(&self, violation_id: i64) -> Result<bool, AppError>;

    /// Every payment with its violation and submitter, newest first.
    async fn list_payments_with_details(&self) -> Result<Vec<PaymentWithDetails>, AppError>;

    /// Payments recorded against one violation, newest first. Possibly empty.
    async fn list_payments_for_violation(
        &self,
        violation_id: i64,
    ) -> Result<Vec<Payment>, AppError>;

    /// The payment whose receipt is stored under `reference`, if any.
    async fn find_payment_by_receipt(
        &self,
        reference: &FileReference,
    ) -> Result<Option<Payment>, AppError>;

    async fn get_violation(&self, violation_id: i64) -> Result<Option<Violation>, AppError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}

const PAYMENT_COLUMNS: &str =
    "payment_id, violation_id, payment_amount, receipt_file, payment_date, status";

#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Build the payment store used by the API.
pub fn create_payment_store(pool: PgPool) -> Arc<dyn PaymentStore> {
    Arc::new(PgPaymentRepository::new(pool))
}

#[async_trait::async_trait]
impl PaymentStore for PgPaymentRepository {
    #[tracing::instrument(skip(self, payment), fields(
        db.system = "postgresql",
        db.table = "payments",
        db.operation = "insert",
        violation_id = payment.violation_id
    ))]
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, AppError> {
        let query = format!(
            r#"
            INSERT INTO payments (violation_id, payment_amount, receipt_file)
            VALUES ($1, $2, $3)
            RETURNING {PAYMENT_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Payment>(&query)
            .bind(payment.violation_id)
            .bind(payment.payment_amount)
            .bind(&payment.receipt_file)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    receipt_file = %payment.receipt_file,
                    "Failed to insert payment"
                );
                AppError::Database(e)
            })?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "violations",
        db.operation = "update"
    ))]
    async fn mark_violation_payment_submitted(&self, violation_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE violations
            SET payment_submitted = TRUE
            WHERE violation_id = $1
            "#,
        )
        .bind(violation_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "payments",
        db.operation = "select"
    ))]
    async fn list_payments_with_details(&self) -> Result<Vec<PaymentWithDetails>, AppError> {
        let rows = sqlx::query_as::<_, PaymentWithDetails>(
            r#"
            SELECT p.payment_id, p.violation_id, p.payment_amount, p.receipt_file,
                   p.payment_date, p.status,
                   v.violation_type, v.fine_amount,
                   u.name AS user_name, u.driving_license_number
            FROM payments p
            JOIN violations v ON p.violation_id = v.violation_id
            LEFT JOIN users u ON v.user_id = u.user_id
            ORDER BY p.payment_date DESC, p.payment_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "payments",
        db.operation = "select"
    ))]
    async fn list_payments_for_violation(
        &self,
        violation_id: i64,
    ) -> Result<Vec<Payment>, AppError> {
        let query = format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE violation_id = $1
            ORDER BY payment_date DESC, payment_id DESC
            "#
        );

        let rows = sqlx::query_as::<_, Payment>(&query)
            .bind(violation_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "payments",
        db.operation = "select"
    ))]
    async fn find_payment_by_receipt(
        &self,
        reference: &FileReference,
    ) -> Result<Option<Payment>, AppError> {
        let query = format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE receipt_file = $1
            LIMIT 1
            "#
        );

        let row = sqlx::query_as::<_, Payment>(&query)
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "violations",
        db.operation = "select"
    ))]
    async fn get_violation(&self, violation_id: i64) -> Result<Option<Violation>, AppError> {
        let row = sqlx::query_as::<_, Violation>(
            r#"
            SELECT violation_id, user_id, violation_type, fine_amount, payment_submitted
            FROM violations
            WHERE violation_id = $1
            "#,
        )
        .bind(violation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
