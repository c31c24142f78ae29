//! Authentication flow orchestration
//!
//! Composes password hashing, TOTP verification, and token issuance into the
//! registration and two-step login sequences. The flow is stateless between
//! requests: `login` and `verify_otp_and_issue_token` are independent calls
//! with no server-side "password already verified" marker. That keeps the
//! service horizontally scalable and is a documented trade-off, not a bug.

use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::{Account, CredentialStore};
use crate::auth::token::TokenIssuer;
use crate::auth::totp;
use crate::error::ApiError;

/// Enrollment material returned once at registration
#[derive(Debug)]
pub struct Enrollment {
    pub totp_secret: String,
    pub provisioning_uri: String,
}

/// A freshly minted session
#[derive(Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub expires_in: i64,
}

/// Orchestrates registration, login, and 2FA verification over an injected
/// credential store
pub struct AuthService<S> {
    store: S,
    tokens: TokenIssuer,
    issuer: String,
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: S, tokens: TokenIssuer, issuer: String) -> Self {
        Self {
            store,
            tokens,
            issuer,
        }
    }

    /// Create an account with a freshly hashed password and a freshly
    /// generated TOTP secret
    ///
    /// Returns the secret and provisioning URI for enrollment; the raw
    /// password is never returned or stored. Duplicate usernames surface as
    /// `DuplicateUsername` from the store's atomic insert.
    pub async fn register(&self, username: &str, password: &str) -> Result<Enrollment, ApiError> {
        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "register: password hashing failed");
            ApiError::Internal
        })?;

        let account = Account {
            username: username.to_string(),
            password_hash,
            totp_secret: totp::generate_secret(),
        };

        self.store.insert(&account).await?;

        let provisioning_uri = totp::provisioning_uri(&account.totp_secret, username, &self.issuer)
            .map_err(|_| ApiError::Internal)?;

        tracing::info!(username = %username, "register: account created");

        Ok(Enrollment {
            totp_secret: account.totp_secret,
            provisioning_uri,
        })
    }

    /// Verify the password step of login
    ///
    /// Succeeds with no token: issuance is strictly gated behind the OTP
    /// step.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let account = self.find(username).await?;

        if !verify_password(password, &account.password_hash) {
            tracing::warn!(username = %username, "login: invalid password");
            return Err(ApiError::InvalidCredentials);
        }

        tracing::info!(username = %username, "login: password verified, awaiting OTP");
        Ok(())
    }

    /// Check a submitted OTP code against the account's TOTP secret
    pub async fn verify_otp(&self, username: &str, code: &str) -> Result<(), ApiError> {
        let account = self.find(username).await?;

        let valid = totp::verify_code(&account.totp_secret, code, username, &self.issuer)
            .map_err(|_| ApiError::Internal)?;

        if !valid {
            tracing::warn!(username = %username, "verify_otp: invalid code");
            return Err(ApiError::InvalidOtp);
        }

        Ok(())
    }

    /// Complete the second login step: validate the OTP and mint a session
    /// token
    pub async fn verify_otp_and_issue_token(
        &self,
        username: &str,
        code: &str,
    ) -> Result<IssuedSession, ApiError> {
        self.verify_otp(username, code).await?;

        let access_token = self.tokens.issue(username).map_err(|e| {
            tracing::error!(error = %e, "verify_otp_and_issue_token: token issuance failed");
            ApiError::Internal
        })?;

        tracing::info!(username = %username, "login: session issued");

        Ok(IssuedSession {
            access_token,
            expires_in: self.tokens.expires_in(),
        })
    }

    /// Render the enrollment QR for an existing account
    pub async fn enrollment_qr(&self, username: &str) -> Result<(String, String), ApiError> {
        let account = self.find(username).await?;

        let uri = totp::provisioning_uri(&account.totp_secret, username, &self.issuer)
            .map_err(|_| ApiError::Internal)?;
        let qr = totp::generate_qr_code(&account.totp_secret, username, &self.issuer)
            .map_err(|_| ApiError::Internal)?;

        Ok((uri, qr))
    }

    async fn find(&self, username: &str) -> Result<Account, ApiError> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}
