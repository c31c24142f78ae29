//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Authentication
    pub jwt_secret: String,
    /// Issuer name shown in authenticator apps and embedded in the
    /// provisioning URI.
    pub totp_issuer: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            jwt_secret: {
                let secret =
                    env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
                // Signing key must be cryptographically strong; a short key
                // makes every session token forgeable.
                if secret.len() < 32 {
                    return Err(ConfigError::WeakSecret(
                        "JWT_SECRET must be at least 32 characters",
                    ));
                }
                secret
            },
            totp_issuer: env::var("TOTP_ISSUER").unwrap_or_else(|_| "SecureApp".to_string()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Config tests modify shared env vars, so they run serially.
    static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_minimal_config() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var(
            "JWT_SECRET",
            "test-jwt-secret-must-be-at-least-32-characters-long",
        );
    }

    fn cleanup_config() {
        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
        env::remove_var("BIND_ADDRESS");
        env::remove_var("TOTP_ISSUER");
    }

    #[test]
    fn test_missing_database_url() {
        let _lock = CONFIG_TEST_MUTEX.lock().unwrap();
        setup_minimal_config();
        env::remove_var("DATABASE_URL");

        match Config::from_env() {
            Err(ConfigError::Missing("DATABASE_URL")) => {}
            other => panic!("Expected Missing error for DATABASE_URL, got: {:?}", other),
        }
        cleanup_config();
    }

    #[test]
    fn test_weak_jwt_secret_rejected() {
        let _lock = CONFIG_TEST_MUTEX.lock().unwrap();
        setup_minimal_config();
        env::set_var("JWT_SECRET", "short");

        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::WeakSecret(_))
        ));
        cleanup_config();
    }

    #[test]
    fn test_defaults() {
        let _lock = CONFIG_TEST_MUTEX.lock().unwrap();
        setup_minimal_config();
        env::remove_var("BIND_ADDRESS");
        env::remove_var("TOTP_ISSUER");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.totp_issuer, "SecureApp");
        assert_eq!(config.database_max_connections, 10);
        cleanup_config();
    }
}
