//! Decode a base64 QR payload to a PNG file
//!
//! The enrollment endpoint returns the QR code as a base64 data URL. This
//! utility turns that payload back into an image for terminals or docs.
//!
//! Usage:
//!   cargo run --bin decode-qr -- <base64-or-data-url> [output.png]
//!   echo "<base64>" | cargo run --bin decode-qr

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::env;
use std::fs;
use std::io::Read;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);

    let payload = match args.next() {
        Some(p) => p,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let output = args.next().unwrap_or_else(|| "qr.png".to_string());

    // Accept either the raw base64 or the full data URL the API returns
    let encoded = payload
        .trim()
        .trim_start_matches("data:image/png;base64,");

    if encoded.is_empty() {
        eprintln!("Error: no base64 payload provided");
        std::process::exit(1);
    }

    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| format!("Invalid base64 payload: {e}"))?;

    fs::write(&output, &bytes)?;
    println!("Wrote {} bytes to {}", bytes.len(), output);

    Ok(())
}
