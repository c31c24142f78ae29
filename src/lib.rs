//! SecureApp authentication service
//!
//! Password login plus TOTP two-factor authentication, issuing short-lived
//! session tokens that gate a small product-catalog API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
