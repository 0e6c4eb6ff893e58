use crate::models::{AccessDecision, Effect, VerificationResult};

/// Map a verification outcome to an access decision for one resource.
///
/// Pure and total: every input produces exactly one decision and nothing
/// here can fail, so the request router always receives a well-formed
/// allow or deny. An invalid result, or a valid one with an empty
/// principal, denies with an empty principal id and no scope context.
/// Scope context is attached only on Allow, and only when the token
/// actually carried scopes.
pub fn render(result: &VerificationResult, resource: &str) -> AccessDecision {
    if !result.is_valid || result.client_id.is_empty() {
        return AccessDecision {
            principal_id: String::new(),
            effect: Effect::Deny,
            resource: resource.to_string(),
            scope_context: None,
        };
    }

    let scope_context = if result.scope.is_empty() {
        None
    } else {
        Some(result.scope.clone())
    };

    AccessDecision {
        principal_id: result.client_id.clone(),
        effect: Effect::Allow,
        resource: resource.to_string(),
        scope_context,
    }
}
