use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error type for the auth gateway.
///
/// Credential, scope, and token faults are deliberately collapsed to a
/// generic 401 body so an unauthenticated caller cannot distinguish which
/// part of a credential failed. Store and signing transport faults map to
/// 5xx so operators can tell "client is unauthorized" apart from "system
/// is unavailable". The full variant is logged server-side.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Client not found")]
    NotFound,

    #[error("Invalid client credentials")]
    InvalidCredential,

    #[error("Requested scope not allowed: {scope}")]
    ScopeNotAllowed { scope: String },

    #[error("Corrupt client record: {0}")]
    CorruptRecord(String),

    #[error("Signing service unavailable: {0}")]
    SigningUnavailable(String),

    #[error("Token issuance failed: {0}")]
    IssuanceFailed(String),

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token algorithm does not match verifier configuration")]
    AlgorithmMismatch,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

impl AuthError {
    /// Stable error category for logs and metrics. Bounded label set.
    pub fn category(&self) -> &'static str {
        match self {
            AuthError::Store(_) => "store",
            AuthError::NotFound | AuthError::InvalidCredential => "authentication",
            AuthError::ScopeNotAllowed { .. } => "authorization",
            AuthError::CorruptRecord(_) => "data_integrity",
            AuthError::SigningUnavailable(_) | AuthError::IssuanceFailed(_) => "signing",
            AuthError::MalformedToken
            | AuthError::AlgorithmMismatch
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_) => "token",
            AuthError::InvalidRequest(_) => "request",
            AuthError::Crypto(_) => "cryptographic",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Store(_)
            | AuthError::CorruptRecord(_)
            | AuthError::SigningUnavailable(_)
            | AuthError::IssuanceFailed(_)
            | AuthError::Crypto(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::NotFound
            | AuthError::InvalidCredential
            | AuthError::ScopeNotAllowed { .. }
            | AuthError::MalformedToken
            | AuthError::AlgorithmMismatch
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Response bodies are generic on purpose: no field-level detail for
        // 401s (credential enumeration), no internals for 5xxs.
        let (status, code, message) = match &self {
            AuthError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                "An internal storage error occurred",
            ),
            AuthError::CorruptRecord(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                "An internal storage error occurred",
            ),
            AuthError::SigningUnavailable(_) | AuthError::IssuanceFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SIGNING_ERROR",
                "Token could not be issued",
            ),
            AuthError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CRYPTO_ERROR",
                "An internal cryptographic error occurred",
            ),
            AuthError::InvalidRequest(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                "The request is malformed",
            ),
            AuthError::NotFound
            | AuthError::InvalidCredential
            | AuthError::ScopeNotAllowed { .. } => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CLIENT",
                "Invalid client credentials",
            ),
            AuthError::MalformedToken
            | AuthError::AlgorithmMismatch
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "The access token is invalid or expired",
            ),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
