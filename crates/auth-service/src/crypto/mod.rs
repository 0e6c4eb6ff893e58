//! Cryptographic primitives shared by token issuance and verification:
//! compact-segment encoding, claim structures, and client-secret hashing.

use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Maximum allowed compact token size in bytes (4KB).
///
/// Tokens larger than this are rejected before any base64 decode or
/// signature work. Typical tokens here are 300-700 bytes; the cap bounds
/// the resources an unauthenticated caller can consume per request.
pub const MAX_TOKEN_SIZE_BYTES: usize = 4096;

/// Dummy bcrypt hash verified against when a client_id has no record, so
/// lookup misses cost the same as secret mismatches.
pub const DUMMY_SECRET_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Compact token header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(default)]
    pub typ: String,
}

impl Header {
    pub fn new(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Token claims.
///
/// `scope` is the space-joined form of the granted scope list; the ordered
/// `Vec<String>` representation is used everywhere inside the service and
/// joined only when the claims cross the token boundary.
///
/// The `client_id` field identifies the principal and is redacted in Debug
/// output so it cannot leak into logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub client_id: String,
    pub scope: String,
    pub iat: i64,
    pub exp: i64,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("iss", &self.iss)
            .field("client_id", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Encode one compact-token segment: base64url, no padding.
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode one compact-token segment.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, AuthError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedToken)
}

/// Hash a client secret with bcrypt using a bounded cost factor.
///
/// Used by provisioning tooling and test fixtures; the service itself only
/// ever verifies.
#[instrument(skip_all)]
pub fn hash_client_secret(secret: &str, cost: u32) -> Result<String, AuthError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(AuthError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(secret, cost)
        .map_err(|e| AuthError::Crypto(format!("Secret hashing failed: {}", e)))
}

/// Verify a presented client secret against a stored bcrypt hash.
///
/// bcrypt embeds its salt in the hash and compares in constant time. A
/// malformed stored hash is reported as `InvalidCredential`, the same
/// outcome the caller sees for a wrong secret.
#[instrument(skip_all)]
pub fn verify_client_secret(secret: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(secret, hash).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Stored secret hash rejected by bcrypt");
        AuthError::InvalidCredential
    })
}
