//! HS256 JWT verification
//!
//! Tokens are issued elsewhere with the shared `JWT_SECRET`; this service only
//! verifies them. [`JwtVerifier::issue`] exists for tooling and tests.

use crate::auth::models::{JwtClaims, Principal};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ticketpay_core::AppError;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CredentialError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Turns a presented bearer credential into a [`Principal`].
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Principal, CredentialError>;
}

#[derive(Clone)]
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `subject` valid for `ttl`.
    pub fn issue(&self, subject: &str, role: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.to_string(),
            role: role.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

impl CredentialVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Principal, CredentialError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| Principal::from(data.claims))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::Invalid(e.to_string()),
            })
    }
}
