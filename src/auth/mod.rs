//! Authentication: password hashing, TOTP, session tokens, and the gate

pub mod middleware;
pub mod password;
pub mod service;
pub mod store;
pub mod token;
pub mod totp;

pub use middleware::{require_auth, AuthUser};
pub use password::{hash_password, verify_password};
pub use service::{AuthService, Enrollment, IssuedSession};
pub use store::{Account, CredentialStore, PgCredentialStore};
pub use token::{Claims, TokenError, TokenIssuer};
pub use totp::TotpError;
