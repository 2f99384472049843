//! Access guard middleware for protected module routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use bookshelf_authz::{AccessGuard, AuthError};

use crate::error::AppError;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Malformed)
}

/// Reject the request unless it carries an admin token.
///
/// On success the decoded claims are stored in the request extensions.
pub async fn require_admin(
    State(guard): State<AccessGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = guard.authorize(token, request.method().as_str(), &request.uri().to_string())?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
