//! Webhook signature verification.
//!
//! Paystack signs each webhook delivery with an HMAC-SHA512 digest of the raw request body, keyed with the account's
//! secret key and sent as lowercase hex in the `x-paystack-signature` header.
//!
//! The digest must be computed over the exact bytes received on the wire. Re-serializing parsed JSON can change
//! whitespace or key order and would break the comparison, so the body is only parsed after it has been verified.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

/// Calculate the lowercase-hex HMAC-SHA512 of `body` under `secret`.
///
/// Returns `None` if the key material cannot be used; callers must treat that as "not verified" rather than as a
/// pass-through. An empty secret is a misconfiguration, not a key: anyone can compute empty-key digests, so it is
/// refused here.
pub fn calculate_hmac(secret: &str, body: &[u8]) -> Option<String> {
    if secret.is_empty() {
        return None;
    }
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    Some(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Check the supplied signature against the HMAC of the raw body. Comparison is constant-time, so the verdict leaks
/// nothing about the expected digest.
pub fn verify_webhook_signature(secret: &str, raw_body: &[u8], supplied: &str) -> bool {
    match calculate_hmac(secret, raw_body) {
        Some(expected) => constant_time_eq(expected.as_bytes(), supplied.as_bytes()),
        None => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
