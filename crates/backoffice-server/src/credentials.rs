// crates/backoffice-server/src/credentials.rs
// ============================================================================
// Module: Credential Helpers
// Description: Secret digests and constant-time comparisons.
// Purpose: Check login secrets without timing side-channels.
// Dependencies: rand, sha2, subtle
// ============================================================================

//! ## Overview
//! New secrets are stored as `sha256:<salt>:<hex>`, where the digest covers
//! a random per-secret salt followed by the secret. Unsalted `sha256:<hex>`
//! digests and legacy plaintext still verify. Every form is compared in
//! constant time over equal-length inputs where possible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix marking a SHA-256 digest secret.
pub const DIGEST_PREFIX: &str = "sha256:";

/// Salt length in bytes.
const SALT_BYTES: usize = 16;

/// Digest compared against when the user does not exist.
const DECOY_SECRET: &str = "sha256:00000000000000000000000000000000:\
                            0000000000000000000000000000000000000000000000000000000000000000";

// ============================================================================
// SECTION: Secrets
// ============================================================================

/// Returns the storable salted digest form of a secret.
#[must_use]
pub fn digest_secret(secret: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt);
    let salt = hex_encode(&salt);
    format!("{DIGEST_PREFIX}{salt}:{}", salted_sha256_hex(&salt, secret))
}

/// Checks a supplied secret against its stored form.
#[must_use]
pub fn verify_secret(stored: &str, supplied: &str) -> bool {
    let Some(digest) = stored.strip_prefix(DIGEST_PREFIX) else {
        return constant_time_eq_str(stored, supplied);
    };
    let digest = digest.to_ascii_lowercase();
    match digest.split_once(':') {
        Some((salt, expected)) => {
            constant_time_eq_str(expected, &salted_sha256_hex(salt, supplied))
        }
        None => constant_time_eq_str(&digest, &salted_sha256_hex("", supplied)),
    }
}

/// Performs a comparison against a decoy so unknown users cost the same.
pub fn verify_decoy(supplied: &str) {
    let _ = verify_secret(DECOY_SECRET, supplied);
}

/// Compares two strings in constant time.
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the lowercase hex SHA-256 digest of a salt followed by a secret.
fn salted_sha256_hex(salt: &str, secret: &str) -> String {
    let digest = Sha256::new().chain_update(salt.as_bytes()).chain_update(secret.as_bytes());
    hex_encode(&digest.finalize())
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
