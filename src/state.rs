//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{AuthService, PgCredentialStore, TokenIssuer};
use crate::config::Config;

/// State shared by every request handler
///
/// Holds no per-request mutable state; the pool is the only shared resource
/// and handles its own concurrency control.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret);
        Self {
            pool,
            config: Arc::new(config),
            tokens,
        }
    }

    /// Build the authentication flow over the Postgres-backed credential store
    pub fn auth_service(&self) -> AuthService<PgCredentialStore> {
        AuthService::new(
            PgCredentialStore::new(self.pool.clone()),
            self.tokens.clone(),
            self.config.totp_issuer.clone(),
        )
    }
}
