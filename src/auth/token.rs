//! Session token issuance and validation
//!
//! Tokens are stateless: validity is computed from the signed claims, never
//! looked up. Expiry is the only invalidation mechanism; there is no
//! revocation list.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Fixed session lifetime: tokens expire 10 minutes after issuance
pub const SESSION_TTL_SECONDS: i64 = 600;

/// Signed claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Mints and validates signed, time-bounded session tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for a subject, valid for exactly [`SESSION_TTL_SECONDS`]
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECONDS,
        };

        // Explicit algorithm prevents algorithm confusion attacks
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validate a token and return its claims
    ///
    /// No grace window: a token is rejected the second its `exp` passes.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Seconds until a freshly issued token expires
    pub fn expires_in(&self) -> i64 {
        SESSION_TTL_SECONDS
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Token signature verification failed")]
    InvalidSignature,
    #[error("Malformed token")]
    Malformed,
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-at-least-32-characters!!";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET)
    }

    /// Encode arbitrary claims with the test secret, bypassing `issue`
    fn encode_raw(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let tokens = issuer();
        let token = tokens.issue("alice").unwrap();

        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECONDS);
    }

    #[test]
    fn test_token_near_expiry_still_valid() {
        let tokens = issuer();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = encode_raw(
            &Claims {
                sub: "alice".to_string(),
                iat: now - (SESSION_TTL_SECONDS - 5),
                exp: now + 5,
            },
            SECRET,
        );

        assert!(tokens.validate(&token).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = issuer();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = encode_raw(
            &Claims {
                sub: "alice".to_string(),
                iat: now - SESSION_TTL_SECONDS - 61,
                exp: now - 61,
            },
            SECRET,
        );

        assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_no_grace_window_after_expiry() {
        let tokens = issuer();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // One second past expiry is already rejected; leeway is zero
        let token = encode_raw(
            &Claims {
                sub: "alice".to_string(),
                iat: now - SESSION_TTL_SECONDS - 1,
                exp: now - 1,
            },
            SECRET,
        );

        assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let tokens = issuer();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let forged = encode_raw(
            &Claims {
                sub: "alice".to_string(),
                iat: now,
                exp: now + SESSION_TTL_SECONDS,
            },
            "a-completely-different-signing-secret!!!",
        );

        assert!(matches!(
            tokens.validate(&forged),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let tokens = issuer();

        assert!(matches!(
            tokens.validate("not.a.token"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(tokens.validate(""), Err(TokenError::Malformed)));
    }
}
