//! TOTP (Time-based One-Time Password) engine for 2FA
//!
//! Secret generation, provisioning URIs, and time-windowed code verification
//! compatible with Google Authenticator, Authy, and other TOTP apps.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use subtle::ConstantTimeEq;
use totp_rs::{Algorithm, Secret, TOTP};

/// TOTP code length (standard is 6 digits)
pub const TOTP_DIGITS: usize = 6;

/// Time step in seconds (standard is 30 seconds)
pub const TOTP_STEP: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    #[error("Invalid TOTP secret")]
    InvalidSecret,
    #[error("Failed to create TOTP instance")]
    Creation,
    #[error("Failed to generate QR code")]
    QrGeneration,
    #[error("System clock before UNIX epoch")]
    Clock,
}

/// Generate a new TOTP secret (base32 encoded)
pub fn generate_secret() -> String {
    Secret::generate_secret().to_encoded().to_string()
}

/// Create a TOTP instance bound to an account and issuer
fn create_totp(secret: &str, username: &str, issuer: &str) -> Result<TOTP, TotpError> {
    let secret_bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .map_err(|_| TotpError::InvalidSecret)?;

    TOTP::new(
        Algorithm::SHA1, // SHA1 is standard for TOTP compatibility
        TOTP_DIGITS,
        1, // skew: allow 1 step before/after for clock drift
        TOTP_STEP,
        secret_bytes,
        Some(issuer.to_string()),
        username.to_string(),
    )
    .map_err(|_| TotpError::Creation)
}

/// The otpauth:// URI an authenticator app enrolls from
pub fn provisioning_uri(secret: &str, username: &str, issuer: &str) -> Result<String, TotpError> {
    let totp = create_totp(secret, username, issuer)?;
    Ok(totp.get_url())
}

/// Generate the code for a given unix timestamp
pub fn code_at(
    secret: &str,
    username: &str,
    issuer: &str,
    time: u64,
) -> Result<String, TotpError> {
    let totp = create_totp(secret, username, issuer)?;
    Ok(totp.generate(time))
}

/// Verify a TOTP code at a given unix timestamp
///
/// Accepts the current 30-second window plus one step either side to
/// tolerate clock skew. Comparison is constant-time so response timing does
/// not leak how many digits matched.
pub fn verify_code_at(
    secret: &str,
    code: &str,
    username: &str,
    issuer: &str,
    time: u64,
) -> Result<bool, TotpError> {
    let totp = create_totp(secret, username, issuer)?;

    // Code format pre-check: exactly 6 ASCII digits
    if code.len() != TOTP_DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }

    let time_steps = [
        time.saturating_sub(TOTP_STEP),
        time,
        time.saturating_add(TOTP_STEP),
    ];

    let code_bytes = code.as_bytes();
    let mut matched = false;

    for time_step in time_steps {
        let expected = totp.generate(time_step);
        let expected_bytes = expected.as_bytes();
        if code_bytes.len() == expected_bytes.len() {
            matched |= bool::from(code_bytes.ct_eq(expected_bytes));
        }
    }

    Ok(matched)
}

/// Verify a TOTP code against the current wall clock
pub fn verify_code(
    secret: &str,
    code: &str,
    username: &str,
    issuer: &str,
) -> Result<bool, TotpError> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_| TotpError::Clock)?
        .as_secs();

    verify_code_at(secret, code, username, issuer, now)
}

/// Render the provisioning URI as a QR code, returned as a base64 PNG data
/// URL for direct display in a client
pub fn generate_qr_code(secret: &str, username: &str, issuer: &str) -> Result<String, TotpError> {
    let uri = provisioning_uri(secret, username, issuer)?;

    let qr = qrcode::QrCode::new(uri.as_bytes()).map_err(|_| TotpError::QrGeneration)?;
    let qr_image = qr.render::<image::Luma<u8>>().build();

    let dynamic_image = image::DynamicImage::ImageLuma8(qr_image);
    let mut png_data = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut png_data);
    dynamic_image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(|_| TotpError::QrGeneration)?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(&png_data)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ISSUER: &str = "SecureApp";
    const USER: &str = "alice";

    // Fixed timestamp well inside a 30s window (1_000_000_000 % 30 == 10)
    const T: u64 = 1_000_000_000;

    #[test]
    fn test_generate_secret_is_base32() {
        let secret = generate_secret();
        assert!(!secret.is_empty());
        assert!(secret
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c)));
    }

    #[test]
    fn test_current_code_verifies() {
        let secret = generate_secret();
        let code = code_at(&secret, USER, ISSUER, T).unwrap();

        assert!(verify_code_at(&secret, &code, USER, ISSUER, T).unwrap());
    }

    #[test]
    fn test_adjacent_window_accepted() {
        let secret = generate_secret();
        let code = code_at(&secret, USER, ISSUER, T).unwrap();

        // One step of drift either way still verifies
        assert!(verify_code_at(&secret, &code, USER, ISSUER, T + TOTP_STEP).unwrap());
        assert!(verify_code_at(&secret, &code, USER, ISSUER, T - TOTP_STEP).unwrap());
    }

    #[test]
    fn test_distant_window_rejected() {
        let secret = generate_secret();
        let code = code_at(&secret, USER, ISSUER, T).unwrap();

        assert!(!verify_code_at(&secret, &code, USER, ISSUER, T + 2 * TOTP_STEP).unwrap());
        assert!(!verify_code_at(&secret, &code, USER, ISSUER, T + 10 * TOTP_STEP).unwrap());
    }

    #[test]
    fn test_wrong_code_rejected() {
        let secret = generate_secret();
        let code = code_at(&secret, USER, ISSUER, T).unwrap();
        let wrong = if code == "000000" { "000001" } else { "000000" };

        assert!(!verify_code_at(&secret, wrong, USER, ISSUER, T).unwrap());
    }

    #[test]
    fn test_bad_format_rejected() {
        let secret = generate_secret();

        assert!(!verify_code_at(&secret, "12345", USER, ISSUER, T).unwrap());
        assert!(!verify_code_at(&secret, "1234567", USER, ISSUER, T).unwrap());
        assert!(!verify_code_at(&secret, "12a456", USER, ISSUER, T).unwrap());
        assert!(!verify_code_at(&secret, "", USER, ISSUER, T).unwrap());
    }

    #[test]
    fn test_provisioning_uri_contents() {
        let secret = generate_secret();
        let uri = provisioning_uri(&secret, USER, ISSUER).unwrap();

        assert!(uri.starts_with("otpauth://totp/"));
        assert!(uri.contains("alice"));
        assert!(uri.contains("issuer=SecureApp"));
        assert!(uri.contains(&secret));
    }

    #[test]
    fn test_qr_code_is_png_data_url() {
        let secret = generate_secret();
        let qr = generate_qr_code(&secret, USER, ISSUER).unwrap();

        assert!(qr.starts_with("data:image/png;base64,"));
        let payload = qr.trim_start_matches("data:image/png;base64,");
        let bytes = BASE64.decode(payload).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_invalid_secret_errors() {
        assert!(matches!(
            code_at("not base32!!", USER, ISSUER, T),
            Err(TotpError::InvalidSecret)
        ));
    }
}
