// crates/backoffice-server/src/session.rs
// ============================================================================
// Module: Session Token Codec
// Description: Stateless signed session tokens carried in a cookie.
// Purpose: Prove a prior successful login without server-side session state.
// Dependencies: base64, ed25519-dalek, serde_json, sha2
// ============================================================================

//! ## Overview
//! A token is `base64url(payload_json) "." base64url(signature)` without
//! padding, where the signature is Ed25519 over the exact payload bytes. The
//! signing key seed is the SHA-256 digest of the configured secret, so every
//! process sharing the secret accepts the same tokens.
//!
//! ## Invariants
//! - Verification fails with the single [`SessionError::InvalidSession`]
//!   for malformed, tampered, foreign, and expired tokens alike.
//! - A token is expired once `now >= expiresAt`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ed25519_dalek::Signature;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted token length in bytes.
pub const MAX_TOKEN_BYTES: usize = 4 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// User identifier from the `users` table.
    pub user_id: i64,
    /// Login name.
    pub username: String,
    /// Issue time (unix seconds).
    pub issued_at: u64,
    /// Expiry time (unix seconds).
    pub expires_at: u64,
}

impl SessionPayload {
    /// Creates a payload valid for `ttl_secs` from `issued_at`.
    #[must_use]
    pub fn new(user_id: i64, username: impl Into<String>, issued_at: u64, ttl_secs: u64) -> Self {
        Self {
            user_id,
            username: username.into(),
            issued_at,
            expires_at: issued_at.saturating_add(ttl_secs),
        }
    }

    /// Returns true when the payload is expired at `now`.
    #[must_use]
    pub const fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// Session codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Token is missing, malformed, tampered, foreign, or expired.
    #[error("invalid session")]
    InvalidSession,
    /// Payload could not be encoded.
    #[error("session encoding failed: {0}")]
    Encoding(String),
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionCodec {
    /// Key used to sign payloads.
    signing_key: SigningKey,
    /// Key used to verify signatures.
    verifying_key: VerifyingKey,
}

impl SessionCodec {
    /// Derives the codec keys from a shared secret.
    #[must_use]
    pub fn from_secret(secret: &str) -> Self {
        let seed: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        let signing_key = SigningKey::from_bytes(&seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Issues a token for the payload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Encoding`] when the payload cannot be encoded.
    pub fn issue(&self, payload: &SessionPayload) -> Result<String, SessionError> {
        let bytes =
            serde_json::to_vec(payload).map_err(|err| SessionError::Encoding(err.to_string()))?;
        let signature = self.signing_key.sign(&bytes);
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&bytes),
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }

    /// Verifies a token against the current clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSession`] for any unusable token.
    pub fn verify(&self, token: &str) -> Result<SessionPayload, SessionError> {
        self.verify_at(token, unix_now())
    }

    /// Verifies a token against an explicit clock reading.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSession`] for any unusable token.
    pub fn verify_at(&self, token: &str, now: u64) -> Result<SessionPayload, SessionError> {
        if token.len() > MAX_TOKEN_BYTES {
            return Err(SessionError::InvalidSession);
        }
        let (encoded_payload, encoded_signature) =
            token.split_once('.').ok_or(SessionError::InvalidSession)?;
        let payload_bytes =
            URL_SAFE_NO_PAD.decode(encoded_payload).map_err(|_| SessionError::InvalidSession)?;
        let signature_bytes =
            URL_SAFE_NO_PAD.decode(encoded_signature).map_err(|_| SessionError::InvalidSession)?;
        let signature = Signature::try_from(signature_bytes.as_slice())
            .map_err(|_| SessionError::InvalidSession)?;
        self.verifying_key
            .verify_strict(&payload_bytes, &signature)
            .map_err(|_| SessionError::InvalidSession)?;
        let payload: SessionPayload =
            serde_json::from_slice(&payload_bytes).map_err(|_| SessionError::InvalidSession)?;
        if payload.is_expired_at(now) {
            return Err(SessionError::InvalidSession);
        }
        Ok(payload)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current unix time in seconds.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
