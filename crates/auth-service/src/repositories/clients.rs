use crate::errors::AuthError;
use crate::models::ClientRecord;
use crate::observability::metrics::record_db_query;
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Instant;

/// Narrow read contract over the client registry.
///
/// The core needs exactly one capability: fetch the stored secret hash and
/// allowed-scope set for a client id. Everything else about the backing
/// store (schema ownership, pooling, migrations) lives outside this trait,
/// and tests substitute an in-memory implementation.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn get_by_client_id(&self, client_id: &str) -> Result<Option<ClientRecord>, AuthError>;
}

/// Postgres-backed client store.
#[derive(Clone)]
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn get_by_client_id(&self, client_id: &str) -> Result<Option<ClientRecord>, AuthError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, ClientRecord>(
            r#"
            SELECT client_id, client_secret_hash, allowed_scopes
            FROM oauth_clients
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        record_db_query("select", "oauth_clients", status, start.elapsed());

        result.map_err(|e| AuthError::Store(format!("Failed to fetch client record: {}", e)))
    }
}
