use crate::crypto::{decode_segment, Claims, Header, MAX_TOKEN_SIZE_BYTES};
use crate::errors::AuthError;
use crate::models::VerificationResult;
use crate::observability::metrics::record_token_validation;
use crate::oracle::TokenAlgorithm;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretBox};
use tracing::instrument;

/// Public verification material, matching the configured algorithm family.
///
/// Injected at construction so tests can substitute fixture keys; there is
/// no process-global key state.
pub enum VerificationKey {
    /// PEM-encoded RSA public key (RS256).
    RsaPem(String),
    /// Shared secret (legacy HS256 mode).
    HmacSecret(SecretBox<Vec<u8>>),
}

/// Verifies compact tokens against one configured algorithm and key.
///
/// The symmetric and asymmetric paths share this single implementation;
/// the algorithm is a configuration value, not a code path. A token that
/// declares any other algorithm is rejected before signature work, which
/// closes the substitution attack where an attacker re-signs a token under
/// a key type of their choosing.
pub struct TokenVerifier {
    expected: TokenAlgorithm,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(
        expected: TokenAlgorithm,
        key: &VerificationKey,
        issuer: &str,
    ) -> Result<Self, AuthError> {
        let decoding_key = match (expected, key) {
            (TokenAlgorithm::Rs256, VerificationKey::RsaPem(pem)) => {
                DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
                    AuthError::Crypto(format!("Invalid RSA public key: {}", e))
                })?
            }
            (TokenAlgorithm::Hs256, VerificationKey::HmacSecret(secret)) => {
                DecodingKey::from_secret(secret.expose_secret())
            }
            _ => {
                return Err(AuthError::Crypto(
                    "Verification key does not match configured algorithm".to_string(),
                ))
            }
        };

        let mut validation = Validation::new(match expected {
            TokenAlgorithm::Rs256 => Algorithm::RS256,
            TokenAlgorithm::Hs256 => Algorithm::HS256,
        });
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Ok(Self {
            expected,
            decoding_key,
            validation,
        })
    }

    /// Verify a compact token and return its claims.
    ///
    /// The signature is checked over the literal first two segments as
    /// received; claims are only trusted after the signature holds.
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        // Size guard before any decoding.
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                token_size = token.len(),
                max_size = MAX_TOKEN_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(AuthError::MalformedToken);
        }

        let segments: Vec<&str> = token.split('.').collect();
        let header_b64 = match segments.as_slice() {
            [h, c, s] if !h.is_empty() && !c.is_empty() && !s.is_empty() => *h,
            _ => return Err(AuthError::MalformedToken),
        };

        // The declared algorithm must equal the configured expectation
        // exactly, checked before any signature work.
        let header: Header = serde_json::from_slice(&decode_segment(header_b64)?)
            .map_err(|_| AuthError::MalformedToken)?;
        if header.alg != self.expected.wire_name() {
            tracing::debug!(declared = %header.alg, expected = %self.expected, "Algorithm mismatch");
            return Err(AuthError::AlgorithmMismatch);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;
        let claims = token_data.claims;

        // jsonwebtoken rejects exp strictly in the past; the boundary
        // instant itself is also invalid here.
        let now = chrono::Utc::now().timestamp();
        if claims.exp <= now {
            return Err(AuthError::TokenExpired);
        }

        if claims.client_id.is_empty() {
            return Err(AuthError::InvalidClaims(
                "client_id claim missing or empty".to_string(),
            ));
        }

        Ok(claims)
    }

    /// Verify a token into a [`VerificationResult`] for decision rendering.
    ///
    /// Failures are logged and counted; the returned result carries no
    /// error detail, so nothing leaks to the unauthenticated caller.
    pub fn check(&self, token: &str) -> VerificationResult {
        match self.verify(token) {
            Ok(claims) => {
                record_token_validation("success", None);
                VerificationResult::valid(claims.client_id, claims.scope)
            }
            Err(e) => {
                tracing::debug!(error = %e, category = e.category(), "Token verification failed");
                record_token_validation("error", Some(e.category()));
                VerificationResult::invalid()
            }
        }
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::AlgorithmMismatch
        }
        ErrorKind::InvalidIssuer => {
            AuthError::InvalidClaims("issuer mismatch".to_string())
        }
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::InvalidClaims(format!("missing required claim: {}", claim))
        }
        ErrorKind::Json(_) => AuthError::InvalidClaims("claims not decodable".to_string()),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            AuthError::MalformedToken
        }
        _ => AuthError::InvalidSignature,
    }
}
