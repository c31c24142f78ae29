//! Credential storage
//!
//! Handlers and the auth flow never touch the accounts table directly; they
//! go through [`CredentialStore`] so the flow can be exercised against an
//! in-memory store in tests and the pool's lifecycle stays hidden behind the
//! interface.

use std::future::Future;

use sqlx::{FromRow, PgPool};

use crate::error::ApiError;

/// A registered account: username, password hash, and the one active TOTP
/// secret
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub totp_secret: String,
}

/// Persistence seam for accounts
///
/// `insert` must be atomic on username uniqueness: under concurrent
/// registration of the same name, exactly one call succeeds and the rest
/// fail with `DuplicateUsername`.
pub trait CredentialStore: Send + Sync {
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Account>, ApiError>> + Send;

    fn insert(&self, account: &Account) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Postgres-backed credential store
///
/// Uniqueness is enforced by the primary key on `accounts.username`; the
/// insert is a single statement, not a read-then-write.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ApiError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT username, password_hash, totp_secret FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: &Account) -> Result<(), ApiError> {
        // Unique violations map to DuplicateUsername via From<sqlx::Error>
        sqlx::query(
            "INSERT INTO accounts (username, password_hash, totp_secret) VALUES ($1, $2, $3)",
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.totp_secret)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
