//! Bearer-token authentication
//!
//! [`middleware::auth_middleware`] turns the `Authorization` header into an
//! [`AuthContext`] and rejects anything that is not authenticated. Services
//! check the context again before doing any work.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{CredentialVerifier, JwtVerifier};
pub use models::{AuthContext, JwtClaims, Principal};
