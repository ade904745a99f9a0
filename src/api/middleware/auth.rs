//! JWT authentication middleware.
//!
//! One middleware per principal kind. Each validates the bearer token and
//! injects the resolved `Principal` into the request extensions.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::PrincipalKind;
use crate::errors::AppError;

/// Require a patient token.
pub async fn require_user(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(state, request, next, PrincipalKind::User).await
}

/// Require a doctor token.
pub async fn require_doctor(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(state, request, next, PrincipalKind::Doctor).await
}

async fn authenticate(
    state: AppState,
    mut request: Request,
    next: Next,
    kind: PrincipalKind,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;

    let principal = state.auth_service.verify_token(token, kind).inspect_err(|e| {
        tracing::debug!(expected = %kind, error = %e, "Rejected bearer token");
    })?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
