use crate::crypto::{self, DUMMY_SECRET_HASH};
use crate::errors::AuthError;
use crate::observability::hash_for_correlation;
use crate::repositories::ClientStore;
use std::time::Duration;
use tracing::instrument;

/// Upper bound on one client-registry read. A slow store fails the single
/// request; it never degrades into a partial success.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Validate presented client credentials and requested scopes.
///
/// Returns the granted scope list (the requested scopes, in request order)
/// on success. An empty request list is valid and grants nothing.
///
/// A missing client record and a wrong secret both surface as 401 to the
/// caller; the distinct `NotFound`/`InvalidCredential` variants exist for
/// server-side logs only. To keep lookup misses from being observable
/// through timing, bcrypt always runs, against a dummy hash when there is
/// no record.
#[instrument(skip_all, fields(client = %hash_for_correlation(client_id)))]
pub async fn validate(
    store: &dyn ClientStore,
    client_id: &str,
    client_secret: &str,
    requested_scopes: &[String],
) -> Result<Vec<String>, AuthError> {
    let record = tokio::time::timeout(STORE_TIMEOUT, store.get_by_client_id(client_id))
        .await
        .map_err(|_| AuthError::Store("Client lookup timed out".to_string()))??;

    let hash_to_verify = record
        .as_ref()
        .map(|r| r.client_secret_hash.as_str())
        .unwrap_or(DUMMY_SECRET_HASH);

    let secret_matches = crypto::verify_client_secret(client_secret, hash_to_verify)?;

    let record = record.ok_or(AuthError::NotFound)?;

    if !secret_matches {
        tracing::debug!("Client secret mismatch");
        return Err(AuthError::InvalidCredential);
    }

    let allowed: Vec<String> = serde_json::from_str(&record.allowed_scopes).map_err(|e| {
        AuthError::CorruptRecord(format!("Stored scope set is not a JSON string array: {}", e))
    })?;

    for scope in requested_scopes {
        if !allowed.contains(scope) {
            tracing::debug!(scope = %scope, "Requested scope not in allow-list");
            return Err(AuthError::ScopeNotAllowed {
                scope: scope.clone(),
            });
        }
    }

    Ok(requested_scopes.to_vec())
}
