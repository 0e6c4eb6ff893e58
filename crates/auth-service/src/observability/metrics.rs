//! Metrics definitions for the auth gateway.
//!
//! Prometheus naming conventions:
//! - `authgw_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `status`: 2 values (success, error)
//! - `error_category`: bounded by `AuthError::category`
//! - `effect`: 2 values (Allow, Deny)
//! - `operation`/`table`: bounded by code and schema

use metrics::{counter, histogram};
use std::time::Duration;

/// Record token issuance duration and outcome.
///
/// Metric: `authgw_token_issuance_duration_seconds`
/// Labels: `status`
pub fn record_token_issuance(status: &str, duration: Duration) {
    histogram!("authgw_token_issuance_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("authgw_token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record token verification result.
///
/// Metric: `authgw_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("authgw_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

/// Record an authorization decision.
///
/// Metric: `authgw_authorization_decisions_total`
/// Labels: `effect`
pub fn record_authorization_decision(effect: &str) {
    counter!("authgw_authorization_decisions_total", "effect" => effect.to_string()).increment(1);
}

/// Record database query duration and outcome.
///
/// Metric: `authgw_db_query_duration_seconds`
/// Labels: `operation`, `table`, `status`
pub fn record_db_query(operation: &str, table: &str, status: &str, duration: Duration) {
    histogram!(
        "authgw_db_query_duration_seconds",
        "operation" => operation.to_string(),
        "table" => table.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a component error by bounded category.
///
/// Metric: `authgw_errors_total`
/// Labels: `operation`, `error_category`
pub fn record_error(operation: &str, error_category: &str) {
    counter!(
        "authgw_errors_total",
        "operation" => operation.to_string(),
        "error_category" => error_category.to_string()
    )
    .increment(1);
}
