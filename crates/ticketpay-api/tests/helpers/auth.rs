//! Token helpers.

use chrono::Duration;
use ticketpay_api::auth::JwtVerifier;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

pub fn valid_token() -> String {
    JwtVerifier::new(TEST_JWT_SECRET)
        .issue("3", "user", Duration::hours(1))
        .expect("Failed to sign token")
}

pub fn expired_token() -> String {
    JwtVerifier::new(TEST_JWT_SECRET)
        .issue("3", "user", Duration::hours(-2))
        .expect("Failed to sign token")
}

/// Well-formed token signed with a different secret.
pub fn foreign_token() -> String {
    JwtVerifier::new("some-other-secret-that-is-32-chars-long!")
        .issue("3", "admin", Duration::hours(1))
        .expect("Failed to sign token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
