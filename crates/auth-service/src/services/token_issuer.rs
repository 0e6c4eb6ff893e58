use crate::crypto::{encode_segment, Claims, Header};
use crate::errors::AuthError;
use crate::oracle::SigningOracle;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Upper bound on one signing-oracle call.
pub const SIGNING_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds compact tokens: header and claims are encoded independently, the
/// two segments joined with `.` form the exact byte message handed to the
/// signing oracle, and the detached signature becomes the third segment.
pub struct TokenIssuer {
    oracle: Arc<dyn SigningOracle>,
    issuer: String,
    lifetime_seconds: i64,
}

impl TokenIssuer {
    pub fn new(oracle: Arc<dyn SigningOracle>, issuer: String, lifetime_seconds: i64) -> Self {
        Self {
            oracle,
            issuer,
            lifetime_seconds,
        }
    }

    /// Token lifetime in seconds, fixed at construction. Callers cannot
    /// influence it.
    pub fn lifetime_seconds(&self) -> i64 {
        self.lifetime_seconds
    }

    /// Issue a signed compact token for `client_id` carrying `scopes`.
    ///
    /// `now` is the issuance instant in Unix seconds; `exp` is always
    /// `now + lifetime`. Any oracle failure, including a timeout, surfaces
    /// as `IssuanceFailed` and no partial token is ever returned.
    #[instrument(skip_all)]
    pub async fn issue(
        &self,
        client_id: &str,
        scopes: &[String],
        now: i64,
    ) -> Result<String, AuthError> {
        let header = Header::new(self.oracle.algorithm().wire_name());
        let claims = Claims {
            iss: self.issuer.clone(),
            client_id: client_id.to_string(),
            scope: scopes.join(" "),
            iat: now,
            exp: now + self.lifetime_seconds,
        };

        let header_bytes = serde_json::to_vec(&header)
            .map_err(|e| AuthError::IssuanceFailed(format!("Header encoding failed: {}", e)))?;
        let claims_bytes = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::IssuanceFailed(format!("Claims encoding failed: {}", e)))?;

        let message = format!(
            "{}.{}",
            encode_segment(&header_bytes),
            encode_segment(&claims_bytes)
        );

        let signature = tokio::time::timeout(SIGNING_TIMEOUT, self.oracle.sign(message.as_bytes()))
            .await
            .map_err(|_| AuthError::IssuanceFailed("Signing timed out".to_string()))?
            .map_err(|e| AuthError::IssuanceFailed(e.to_string()))?;

        Ok(format!("{}.{}", message, encode_segment(&signature)))
    }
}
