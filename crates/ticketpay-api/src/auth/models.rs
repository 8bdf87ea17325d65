use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use ticketpay_core::AppError;

pub const MISSING_TOKEN_MESSAGE: &str = "Access denied. No token provided.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token.";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    pub sub: String,  // user id
    pub role: String, // "user" or "admin"
    pub exp: i64,     // expiration timestamp
    pub iat: i64,     // issued at timestamp
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub subject: String,
    pub role: String,
}

impl From<JwtClaims> for Principal {
    fn from(claims: JwtClaims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

/// Outcome of credential verification for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthContext {
    Authenticated(Principal),
    /// No credential was presented.
    Anonymous,
    /// A credential was presented and rejected.
    Invalid(String),
}

impl AuthContext {
    /// The principal, or the error the request must fail with.
    pub fn require(&self) -> Result<&Principal, AppError> {
        match self {
            AuthContext::Authenticated(principal) => Ok(principal),
            AuthContext::Anonymous => Err(AppError::Unauthorized(MISSING_TOKEN_MESSAGE.to_string())),
            AuthContext::Invalid(_) => Err(AppError::Forbidden(INVALID_TOKEN_MESSAGE.to_string())),
        }
    }
}

// Extracted from request parts so it can sit next to `Multipart` in handlers.
// A request that never passed through the middleware is anonymous.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or(AuthContext::Anonymous))
    }
}
