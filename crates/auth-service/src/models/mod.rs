use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Client registration record (maps to the `oauth_clients` table).
///
/// Owned and mutated by provisioning tooling; this service only reads it.
/// `allowed_scopes` is the persisted JSON array of scope strings, parsed
/// on use by the client validator.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRecord {
    pub client_id: String,
    pub client_secret_hash: String,
    pub allowed_scopes: String,
}

/// Token response (OAuth 2.0 compliant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub scope: String,
}

/// Outcome of verifying one bearer token.
///
/// Constructed per verification call and never persisted. On failure the
/// identifying fields are empty; the underlying error is logged server-side
/// and never reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub client_id: String,
    pub scope: String,
}

impl VerificationResult {
    pub fn valid(client_id: String, scope: String) -> Self {
        Self {
            is_valid: true,
            client_id,
            scope,
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            client_id: String::new(),
            scope: String::new(),
        }
    }
}

/// Allow/deny outcome of one authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// Access decision returned to the request router for enforcement.
///
/// `scope_context` is attached only when the effect is Allow; downstream
/// resource checks read it as the caller's granted permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub principal_id: String,
    pub effect: Effect,
    pub resource: String,
    pub scope_context: Option<String>,
}
