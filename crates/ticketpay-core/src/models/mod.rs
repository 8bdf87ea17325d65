//! Data models for the application

mod payment;
mod violation;

pub use payment::*;
pub use violation::*;
