//! Custom test assertions for expressive tests.
//!
//! Provides trait-based assertions over issued compact tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// Compact token header structure
#[derive(Debug, Deserialize)]
struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

/// Compact token claims structure
#[derive(Debug, Deserialize)]
struct TokenClaims {
    pub iss: String,
    pub client_id: String,
    pub scope: String,
    pub iat: i64,
    pub exp: i64,
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_compact_token()
///     .assert_algorithm("RS256")
///     .assert_has_scope("read");
/// ```
pub trait TokenAssertions {
    /// Assert the token is a well-formed three-segment compact token.
    fn assert_valid_compact_token(&self) -> &Self;

    /// Assert the header declares the given algorithm.
    fn assert_algorithm(&self, alg: &str) -> &Self;

    /// Assert the claims contain the specified scope.
    fn assert_has_scope(&self, scope: &str) -> &Self;

    /// Assert the token is for the specified client.
    fn assert_for_client(&self, client_id: &str) -> &Self;

    /// Assert the token was issued by the specified issuer.
    fn assert_issued_by(&self, issuer: &str) -> &Self;

    /// Assert the claimed lifetime (`exp - iat`) equals `seconds`.
    fn assert_lifetime(&self, seconds: i64) -> &Self;
}

fn decode_claims(token: &str) -> TokenClaims {
    let parts: Vec<_> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "token must have three segments");
    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .expect("claims segment decodes as base64url");
    serde_json::from_slice(&payload).expect("claims segment is valid JSON")
}

impl TokenAssertions for String {
    fn assert_valid_compact_token(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "token must have 3 segments (header.claims.signature), got {}",
            parts.len()
        );

        let header_bytes = URL_SAFE_NO_PAD
            .decode(parts[0])
            .expect("header segment decodes as base64url");
        let header: TokenHeader =
            serde_json::from_slice(&header_bytes).expect("header segment is valid JSON");
        assert_eq!(header.typ, "JWT", "expected JWT type");
        assert!(
            header.alg == "RS256" || header.alg == "HS256",
            "unexpected algorithm: {}",
            header.alg
        );

        // Claims must decode too
        decode_claims(self);

        let signature = URL_SAFE_NO_PAD
            .decode(parts[2])
            .expect("signature segment decodes as base64url");
        assert!(!signature.is_empty(), "signature must be non-empty");

        self
    }

    fn assert_algorithm(&self, alg: &str) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        let header_bytes = URL_SAFE_NO_PAD
            .decode(parts[0])
            .expect("header segment decodes as base64url");
        let header: TokenHeader =
            serde_json::from_slice(&header_bytes).expect("header segment is valid JSON");
        assert_eq!(header.alg, alg, "token algorithm mismatch");
        self
    }

    fn assert_has_scope(&self, scope: &str) -> &Self {
        let claims = decode_claims(self);
        let scopes: Vec<_> = claims.scope.split_whitespace().collect();
        assert!(
            scopes.contains(&scope),
            "token does not contain scope '{}'. Available scopes: {}",
            scope,
            claims.scope
        );
        self
    }

    fn assert_for_client(&self, client_id: &str) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(claims.client_id, client_id, "token client_id mismatch");
        self
    }

    fn assert_issued_by(&self, issuer: &str) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(claims.iss, issuer, "token issuer mismatch");
        self
    }

    fn assert_lifetime(&self, seconds: i64) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "token lifetime mismatch"
        );
        self
    }
}
