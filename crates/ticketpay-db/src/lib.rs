//! Record-store access for payments and violations
//!
//! [`PaymentStore`] is the seam the API depends on. [`PgPaymentRepository`]
//! is the production implementation; [`InMemoryPaymentStore`] backs tests and
//! local experiments without a database.

pub mod db;

pub use db::{
    create_payment_store, InMemoryPaymentStore, PaymentStore, PgPaymentRepository,
};
