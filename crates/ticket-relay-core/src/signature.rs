//! Webhook signature verification.
//!
//! Jira signs webhook deliveries with HMAC-SHA256 over the raw request body
//! and sends the result as `X-Hub-Signature: sha256=<hex>`. Verification
//! must run against the exact bytes received on the wire: re-serializing a
//! parsed payload changes whitespace and key order and silently breaks the
//! comparison for every affected delivery.
//!
//! # Security
//!
//! - Uses constant-time comparison to prevent timing attacks
//! - Never logs secrets or signature values
//! - A malformed signature header is a verification failure, never a panic

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify an HMAC-SHA256 webhook signature.
///
/// The header value is trimmed, lower-cased, and stripped of an optional
/// `sha256=` prefix before hex decoding. Returns `false` for any missing
/// input, a malformed header (odd-length or non-hex characters), or a
/// signature mismatch.
///
/// # Arguments
///
/// * `secret` - The shared webhook secret
/// * `raw_body` - The request body exactly as received, before any parsing
/// * `signature_header` - The value of the signature header
pub fn verify_signature(secret: &str, raw_body: &[u8], signature_header: &str) -> bool {
    if secret.is_empty() || raw_body.is_empty() || signature_header.is_empty() {
        return false;
    }

    let normalized = signature_header.trim().to_lowercase();
    let received_hex = normalized
        .strip_prefix(SIGNATURE_PREFIX)
        .unwrap_or(&normalized);
    if received_hex.is_empty() {
        return false;
    }

    let Ok(received) = hex::decode(received_hex) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(raw_body);
    let expected = mac.finalize().into_bytes();

    // Length check first; only the byte comparison needs constant time.
    if received.len() != expected.len() {
        return false;
    }
    received.as_slice().ct_eq(expected.as_slice()).into()
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
