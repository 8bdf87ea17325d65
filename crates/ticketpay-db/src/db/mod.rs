//! Database repositories
//
// Payment record store trait and PostgreSQL repository
pub mod payment;
//
// In-memory record store
pub mod memory;

pub use memory::InMemoryPaymentStore;
pub use payment::{create_payment_store, PaymentStore, PgPaymentRepository};
