//! Observability for the auth gateway.
//!
//! All instrumentation uses `#[instrument(skip_all)]` with explicit safe
//! fields. Client identifiers appear in logs only as truncated SHA-256
//! correlation hashes; secrets and tokens never appear at all.

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// Used for fields like `client_id` that need correlation across log
/// entries but should not be stored in plaintext. Not a secrecy mechanism;
/// the truncation limits reversibility while keeping entries joinable.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    hex::encode(result.get(..4).unwrap_or_default())
}
