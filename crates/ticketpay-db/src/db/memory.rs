use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;
use ticketpay_core::models::{
    NewPayment, Payment, PaymentStatus, PaymentWithDetails, Violation,
};
use ticketpay_core::{AppError, FileReference};

use super::payment::PaymentStore;

#[derive(Debug, Clone)]
struct UserRecord {
    name: String,
    driving_license_number: Option<String>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<i64, UserRecord>,
    violations: HashMap<i64, Violation>,
    payments: Vec<Payment>,
    next_payment_id: i64,
}

/// Record store held in process memory.
///
/// Mirrors the PostgreSQL schema closely enough for the API to run against it:
/// payments must reference a known violation, ids are generated in sequence,
/// and listings come back newest first. Failure switches let tests exercise
/// the record-store error paths.
#[derive(Default)]
pub struct InMemoryPaymentStore {
    tables: RwLock<Tables>,
    fail_payment_inserts: AtomicBool,
    fail_violation_updates: AtomicBool,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(
        &self,
        user_id: i64,
        name: impl Into<String>,
        driving_license_number: Option<String>,
    ) {
        self.tables.write().await.users.insert(
            user_id,
            UserRecord {
                name: name.into(),
                driving_license_number,
            },
        );
    }

    pub async fn insert_violation(&self, violation: Violation) {
        self.tables
            .write()
            .await
            .violations
            .insert(violation.violation_id, violation);
    }

    /// Make every subsequent payment insert fail with a database error.
    pub fn fail_payment_inserts(&self, fail: bool) {
        self.fail_payment_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent violation flag update fail with a database error.
    pub fn fail_violation_updates(&self, fail: bool) {
        self.fail_violation_updates.store(fail, Ordering::SeqCst);
    }

    /// All stored payments in insertion order.
    pub async fn payments(&self) -> Vec<Payment> {
        self.tables.read().await.payments.clone()
    }
}

fn newest_first(payments: &mut [Payment]) {
    payments.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then(b.payment_id.cmp(&a.payment_id))
    });
}

#[async_trait::async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, AppError> {
        if self.fail_payment_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut tables = self.tables.write().await;

        // Same outcome as the foreign key on payments.violation_id.
        if !tables.violations.contains_key(&payment.violation_id) {
            return Err(AppError::Database(sqlx::Error::RowNotFound));
        }

        tables.next_payment_id += 1;
        let created = Payment {
            payment_id: tables.next_payment_id,
            violation_id: payment.violation_id,
            payment_amount: payment.payment_amount,
            receipt_file: payment.receipt_file,
            payment_date: Utc::now(),
            status: PaymentStatus::Pending,
        };
        tables.payments.push(created.clone());

        Ok(created)
    }

    async fn mark_violation_payment_submitted(&self, violation_id: i64) -> Result<bool, AppError> {
        if self.fail_violation_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut tables = self.tables.write().await;
        match tables.violations.get_mut(&violation_id) {
            Some(violation) => {
                violation.payment_submitted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_payments_with_details(&self) -> Result<Vec<PaymentWithDetails>, AppError> {
        let tables = self.tables.read().await;

        let mut payments: Vec<Payment> = tables
            .payments
            .iter()
            .filter(|p| tables.violations.contains_key(&p.violation_id))
            .cloned()
            .collect();
        newest_first(&mut payments);

        let rows = payments
            .into_iter()
            .map(|payment| {
                let violation = tables.violations.get(&payment.violation_id);
                let user = violation
                    .and_then(|v| v.user_id)
                    .and_then(|id| tables.users.get(&id));
                PaymentWithDetails {
                    violation_type: violation.map(|v| v.violation_type.clone()),
                    fine_amount: violation.map(|v| v.fine_amount),
                    user_name: user.map(|u| u.name.clone()),
                    driving_license_number: user.and_then(|u| u.driving_license_number.clone()),
                    payment,
                }
            })
            .collect();

        Ok(rows)
    }

    async fn list_payments_for_violation(
        &self,
        violation_id: i64,
    ) -> Result<Vec<Payment>, AppError> {
        let mut payments: Vec<Payment> = self
            .tables
            .read()
            .await
            .payments
            .iter()
            .filter(|p| p.violation_id == violation_id)
            .cloned()
            .collect();
        newest_first(&mut payments);
        Ok(payments)
    }

    async fn find_payment_by_receipt(
        &self,
        reference: &FileReference,
    ) -> Result<Option<Payment>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .payments
            .iter()
            .find(|p| &p.receipt_file == reference)
            .cloned())
    }

    async fn get_violation(&self, violation_id: i64) -> Result<Option<Violation>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .violations
            .get(&violation_id)
            .cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
