use crate::errors::AuthError;
use crate::models::TokenResponse;
use crate::observability::metrics::{record_error, record_token_issuance};
use crate::repositories::ClientStore;
use crate::services::client_validator;
use crate::services::token_issuer::TokenIssuer;
use crate::services::token_verifier::TokenVerifier;
use axum::{extract::State, http::HeaderMap, Json};
use base64::{engine::general_purpose, Engine as _};
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Application state shared across handlers.
pub struct AppState {
    pub store: Arc<dyn ClientStore>,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
    pub metrics: Option<PrometheusHandle>,
}

/// Token endpoint request body (OAuth 2.0 Client Credentials).
///
/// `client_secret` is wrapped so a derived Debug cannot leak it.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub scope: Option<String>,
}

/// Handle token issuance (OAuth 2.0 Client Credentials).
///
/// POST /api/v1/oauth/token
///
/// Accepts a JSON or form-encoded body; client credentials may arrive via
/// HTTP Basic Auth or the body. Any credential or scope failure renders the
/// same generic 401; store and signing faults render 500.
#[instrument(name = "authgw.token.issue", skip_all, fields(status))]
pub async fn handle_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<TokenResponse>, AuthError> {
    let start = Instant::now();
    let result = issue_token(&state, &headers, &body).await;

    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_token_issuance(status, start.elapsed());

    match result {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            record_error("issue_token", e.category());
            Err(e)
        }
    }
}

async fn issue_token(
    state: &AppState,
    headers: &HeaderMap,
    body: &str,
) -> Result<TokenResponse, AuthError> {
    let payload = parse_token_request(headers, body)?;

    if let Some(grant_type) = payload.grant_type.as_deref() {
        if grant_type != "client_credentials" {
            return Err(AuthError::InvalidRequest(format!(
                "Unsupported grant_type: {}",
                grant_type
            )));
        }
    }

    let requested_scopes = parse_scope_param(payload.scope.as_deref());
    let (client_id, client_secret) = extract_client_credentials(headers, payload)?;

    let granted = client_validator::validate(
        state.store.as_ref(),
        &client_id,
        client_secret.expose_secret(),
        &requested_scopes,
    )
    .await?;

    let now = chrono::Utc::now().timestamp();
    let access_token = state.issuer.issue(&client_id, &granted, now).await?;

    Ok(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.issuer.lifetime_seconds().unsigned_abs(),
        scope: granted.join(" "),
    })
}

/// Parse the request body by declared content type: JSON, or form-encoded
/// as the default (the shape OAuth token endpoints conventionally take).
fn parse_token_request(headers: &HeaderMap, body: &str) -> Result<TokenRequest, AuthError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/x-www-form-urlencoded");

    if content_type.starts_with("application/json") {
        serde_json::from_str(body)
            .map_err(|e| AuthError::InvalidRequest(format!("Invalid JSON body: {}", e)))
    } else {
        serde_urlencoded::from_str(body)
            .map_err(|e| AuthError::InvalidRequest(format!("Invalid form body: {}", e)))
    }
}

/// Split a scope parameter on commas and whitespace, dropping empties.
fn parse_scope_param(scope: Option<&str>) -> Vec<String> {
    scope
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Extract client credentials from Basic Auth or the request body.
fn extract_client_credentials(
    headers: &HeaderMap,
    payload: TokenRequest,
) -> Result<(String, SecretString), AuthError> {
    if let Some(pair) = basic_credentials(headers)? {
        return Ok(pair);
    }

    match (payload.client_id, payload.client_secret) {
        (Some(id), Some(secret)) => Ok((id, secret)),
        _ => Err(AuthError::InvalidCredential),
    }
}

fn basic_credentials(headers: &HeaderMap) -> Result<Option<(String, SecretString)>, AuthError> {
    let Some(auth_header) = headers.get("authorization") else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidCredential)?;

    let Some(basic) = auth_str.strip_prefix("Basic ") else {
        return Ok(None);
    };

    let decoded = general_purpose::STANDARD
        .decode(basic)
        .map_err(|_| AuthError::InvalidCredential)?;
    let credentials = String::from_utf8(decoded).map_err(|_| AuthError::InvalidCredential)?;

    match credentials.split_once(':') {
        Some((id, secret)) => Ok(Some((id.to_string(), SecretString::from(secret)))),
        None => Err(AuthError::InvalidCredential),
    }
}
