//! Test utilities for the auth gateway.
//!
//! Provides token assertion helpers, fixture key material, and an
//! in-memory client store so service tests run without a database or
//! external signer.

pub mod assertions;
pub mod fixtures;
pub mod server_harness;
pub mod store;

pub use server_harness::TestAuthServer;
