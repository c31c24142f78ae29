//! Authentication routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    extract::ValidJson,
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub username: String,
    pub otp_code: String,
}

#[derive(Debug, Deserialize)]
pub struct QrQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    /// Shown once at registration for authenticator enrollment
    pub totp_secret: String,
    pub provisioning_uri: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct QrResponse {
    pub otp_auth_url: String,
    /// Base64 PNG data URL for direct display
    pub qr_code: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn require_field(value: &str, name: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::MissingField(format!("{name} is required")));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account
///
/// Returns the TOTP secret and provisioning URI for enrollment; the raw
/// password never leaves the request.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    require_field(&req.username, "username")?;
    require_field(&req.password, "password")?;

    let enrollment = state
        .auth_service()
        .register(&req.username, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            totp_secret: enrollment.totp_secret,
            provisioning_uri: enrollment.provisioning_uri,
        }),
    ))
}

/// Login step one: verify the password
///
/// On success the caller is prompted for the OTP; no token is issued here.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CredentialsRequest>,
) -> ApiResult<Json<LoginResponse>> {
    require_field(&req.username, "username")?;
    require_field(&req.password, "password")?;

    state
        .auth_service()
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Enter 2FA code".to_string(),
        username: req.username,
    }))
}

/// Login step two: verify the OTP and issue a session token
pub async fn login_2fa(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<OtpRequest>,
) -> ApiResult<Json<TokenResponse>> {
    require_field(&req.username, "username")?;
    require_field(&req.otp_code, "otp_code")?;

    let session = state
        .auth_service()
        .verify_otp_and_issue_token(&req.username, &req.otp_code)
        .await?;

    Ok(Json(TokenResponse {
        message: "Login successful".to_string(),
        access_token: session.access_token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
    }))
}

/// Out-of-band 2FA check (e.g. confirming enrollment worked)
pub async fn verify_2fa(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<OtpRequest>,
) -> ApiResult<Json<MessageResponse>> {
    require_field(&req.username, "username")?;
    require_field(&req.otp_code, "otp_code")?;

    state
        .auth_service()
        .verify_otp(&req.username, &req.otp_code)
        .await?;

    Ok(Json(MessageResponse {
        message: "2FA verification successful".to_string(),
    }))
}

/// Enrollment QR for an existing account
///
/// GET /auth/qr?username=alice
pub async fn enrollment_qr(
    State(state): State<AppState>,
    Query(query): Query<QrQuery>,
) -> ApiResult<Json<QrResponse>> {
    let username = query.username.as_deref().unwrap_or_default();
    require_field(username, "username")?;

    let (otp_auth_url, qr_code) = state.auth_service().enrollment_qr(username).await?;

    Ok(Json(QrResponse {
        otp_auth_url,
        qr_code,
    }))
}
