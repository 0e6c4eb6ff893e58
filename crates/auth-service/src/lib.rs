//! OAuth2 client-credentials token service for the API gateway.
//!
//! Issues signed bearer tokens to machine clients authenticating with
//! id + secret, and answers per-request authorization checks by verifying
//! presented tokens and rendering allow/deny policy decisions.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Compact-token primitives and secret hashing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `models` - Data models
//! - `oracle` - Signing oracle abstraction and implementations
//! - `repositories` - Client registry access layer
//! - `routes` - Router assembly
//! - `services` - Validation, issuance, verification, decision rendering

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod oracle;
pub mod repositories;
pub mod routes;
pub mod services;
