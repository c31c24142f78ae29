//! Authorization gate for protected routes
//!
//! Validates the presented session token before a request reaches any
//! protected handler. Binary allow/deny, re-evaluated on every request;
//! authorization decisions are never cached.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated subject, inserted as a request extension on success
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Middleware that requires a valid `Authorization: Bearer` session token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.tokens.validate(token)?;

    req.extensions_mut().insert(AuthUser {
        username: claims.sub,
    });

    Ok(next.run(req).await)
}
