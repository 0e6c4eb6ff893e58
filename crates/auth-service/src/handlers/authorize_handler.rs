use crate::handlers::AppState;
use crate::models::{AccessDecision, VerificationResult};
use crate::observability::metrics::record_authorization_decision;
use crate::services::decision;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Authorizer request, as delivered by the request-routing gateway for
/// each incoming API call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    /// Raw Authorization header value, expected form `Bearer <token>`.
    pub authorization_token: String,
    /// Identifier of the resource the caller is trying to reach.
    #[serde(alias = "methodArn")]
    pub resource: String,
}

/// Allow/deny policy document rendered for the gateway.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<AuthorizerContext>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: Vec<String>,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Resource")]
    pub resource: Vec<String>,
}

/// Context map attached to Allow decisions; downstream policy checks read
/// the granted scopes under `permissions`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorizerContext {
    pub permissions: String,
}

const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";

impl From<AccessDecision> for AuthorizeResponse {
    fn from(decision: AccessDecision) -> Self {
        AuthorizeResponse {
            principal_id: decision.principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement {
                    action: vec![INVOKE_ACTION.to_string()],
                    effect: decision.effect.as_str().to_string(),
                    resource: vec![decision.resource],
                }],
            },
            context: decision
                .scope_context
                .map(|permissions| AuthorizerContext { permissions }),
        }
    }
}

/// Handle one authorization check.
///
/// POST /api/v1/authorize
///
/// Always answers with a well-formed policy document: verification
/// failures of any kind render as Deny, never as an error status, and the
/// failure reason stays in the server-side logs.
#[instrument(name = "authgw.authorize", skip_all, fields(effect))]
pub async fn handle_authorize(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AuthorizeRequest>,
) -> Json<AuthorizeResponse> {
    let result = match extract_bearer_token(&payload.authorization_token) {
        Some(token) => state.verifier.check(token),
        None => {
            tracing::debug!("Authorization header missing or not Bearer");
            VerificationResult::invalid()
        }
    };

    let decision = decision::render(&result, &payload.resource);
    tracing::Span::current().record("effect", decision.effect.as_str());
    record_authorization_decision(decision.effect.as_str());

    Json(AuthorizeResponse::from(decision))
}

/// Extract the token from a `Bearer <token>` header value. The scheme is
/// matched case-insensitively; anything else yields no token.
fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
