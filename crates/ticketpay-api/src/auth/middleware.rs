use crate::auth::models::{AuthContext, INVALID_TOKEN_MESSAGE, MISSING_TOKEN_MESSAGE};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use ticketpay_core::AppError;

/// Token part of a `Bearer <token>` header value. Any other shape, including
/// a bare token without the scheme, yields `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the request's [`AuthContext`] from its bearer header.
pub fn resolve_auth_context(state: &AppState, request: &Request) -> AuthContext {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token);

    let Some(token) = token else {
        return AuthContext::Anonymous;
    };

    match state.verifier.verify(token) {
        Ok(principal) => AuthContext::Authenticated(principal),
        Err(e) => AuthContext::Invalid(e.to_string()),
    }
}

/// Reject unauthenticated requests before any handler runs.
///
/// Missing credential: 401. Presented but rejected credential: 403.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = resolve_auth_context(&state, &request);

    match context {
        AuthContext::Authenticated(ref principal) => {
            tracing::debug!(subject = %principal.subject, role = %principal.role, "Request authenticated");
        }
        AuthContext::Anonymous => {
            tracing::debug!(path = %request.uri().path(), "Missing bearer token");
            return HttpAppError(AppError::Unauthorized(MISSING_TOKEN_MESSAGE.to_string()))
                .into_response();
        }
        AuthContext::Invalid(ref reason) => {
            tracing::warn!(path = %request.uri().path(), reason = %reason, "Rejected bearer token");
            return HttpAppError(AppError::Forbidden(INVALID_TOKEN_MESSAGE.to_string()))
                .into_response();
        }
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("BEARER  abc.def.ghi "), Some("abc.def.ghi"));

        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token(""), None);
    }
}
