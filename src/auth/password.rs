//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id
///
/// Each call embeds a fresh random salt, so hashing the same password twice
/// produces different strings.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verify a password against a stored hash
///
/// A malformed stored hash is an ordinary mismatch, never an error: the
/// caller sees `false` and rejects the login.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct horse battery staple";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let password = "same input";
        let first = hash_password(password).unwrap();
        let second = hash_password(password).unwrap();

        // Random salt per call means identical inputs hash differently
        assert_ne!(first, second);
        assert!(verify_password(password, &first));
        assert!(verify_password(password, &second));
    }

    #[test]
    fn test_malformed_hash_is_false_not_panic() {
        assert!(!verify_password("anything", "not-an-argon2-hash"));
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "$argon2id$garbage"));
    }
}
