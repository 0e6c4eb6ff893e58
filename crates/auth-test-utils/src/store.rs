//! In-memory client store for tests.

use async_trait::async_trait;
use auth_service::errors::AuthError;
use auth_service::models::ClientRecord;
use auth_service::repositories::ClientStore;
use std::collections::HashMap;

use crate::fixtures::test_secret_hash;

/// [`ClientStore`] backed by a map, with an optional injected fault so
/// tests can exercise the store-unavailable path.
#[derive(Default)]
pub struct MemoryClientStore {
    records: HashMap<String, ClientRecord>,
    failure: Option<String>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read fails with the given reason.
    pub fn failing(reason: &str) -> Self {
        Self {
            records: HashMap::new(),
            failure: Some(reason.to_string()),
        }
    }

    /// Register a client, hashing `secret` and JSON-encoding the scopes
    /// the way the real registry stores them.
    pub fn with_client(mut self, client_id: &str, secret: &str, scopes: &[&str]) -> Self {
        let allowed_scopes =
            serde_json::to_string(scopes).expect("scope list serializes to JSON");
        self.records.insert(
            client_id.to_string(),
            ClientRecord {
                client_id: client_id.to_string(),
                client_secret_hash: test_secret_hash(secret),
                allowed_scopes,
            },
        );
        self
    }

    /// Register a client with a raw stored hash and raw scope text, for
    /// corrupt-record and malformed-hash tests.
    pub fn with_raw_client(
        mut self,
        client_id: &str,
        client_secret_hash: String,
        allowed_scopes: String,
    ) -> Self {
        self.records.insert(
            client_id.to_string(),
            ClientRecord {
                client_id: client_id.to_string(),
                client_secret_hash,
                allowed_scopes,
            },
        );
        self
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn get_by_client_id(&self, client_id: &str) -> Result<Option<ClientRecord>, AuthError> {
        if let Some(reason) = &self.failure {
            return Err(AuthError::Store(reason.clone()));
        }

        Ok(self.records.get(client_id).cloned())
    }
}
