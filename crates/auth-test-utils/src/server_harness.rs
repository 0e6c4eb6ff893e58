//! Test server harness for end-to-end testing.
//!
//! Spawns real auth gateway instances on an ephemeral port, backed by an
//! in-memory client store and fixture keys, so tests exercise the full
//! HTTP surface without a database or external signer.

use crate::fixtures;
use crate::store::MemoryClientStore;
use async_trait::async_trait;
use auth_service::errors::AuthError;
use auth_service::handlers::AppState;
use auth_service::oracle::{HmacSigner, RsaSigner, SigningOracle, TokenAlgorithm};
use auth_service::routes;
use auth_service::services::token_issuer::TokenIssuer;
use auth_service::services::token_verifier::{TokenVerifier, VerificationKey};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Issuer identity used by every spawned test server.
pub const TEST_ISSUER: &str = "https://api.test.example.com";

/// Token lifetime used by every spawned test server.
pub const TEST_LIFETIME_SECONDS: i64 = 3600;

/// Oracle whose every signing attempt fails, for 5xx-path tests.
pub struct FailingSigner;

#[async_trait]
impl SigningOracle for FailingSigner {
    fn algorithm(&self) -> TokenAlgorithm {
        TokenAlgorithm::Hs256
    }

    async fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, AuthError> {
        Err(AuthError::SigningUnavailable(
            "signer unreachable".to_string(),
        ))
    }
}

/// Build a [`TokenIssuer`] over the fixture HMAC secret, for minting
/// tokens (including expired ones) directly in tests.
pub fn hmac_test_issuer() -> TokenIssuer {
    TokenIssuer::new(
        Arc::new(HmacSigner::new(fixtures::hmac_shared_secret())),
        TEST_ISSUER.to_string(),
        TEST_LIFETIME_SECONDS,
    )
}

/// Test harness for spawning the auth gateway in end-to-end tests.
///
/// # Example
/// ```rust,ignore
/// let store = MemoryClientStore::new().with_client("acme", "secret", &["read"]);
/// let server = TestAuthServer::spawn(store).await?;
/// let client = reqwest::Client::new();
///
/// let response = client
///     .post(format!("{}/api/v1/oauth/token", server.url()))
///     .json(&request)
///     .send()
///     .await?;
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server in the default HS256 fixture configuration.
    pub async fn spawn(store: MemoryClientStore) -> Result<Self, anyhow::Error> {
        Self::spawn_with_algorithm(store, TokenAlgorithm::Hs256).await
    }

    /// Spawn a server configured for the given algorithm, using the
    /// fixture key material for that family.
    pub async fn spawn_with_algorithm(
        store: MemoryClientStore,
        algorithm: TokenAlgorithm,
    ) -> Result<Self, anyhow::Error> {
        let (oracle, key): (Arc<dyn SigningOracle>, VerificationKey) = match algorithm {
            TokenAlgorithm::Hs256 => (
                Arc::new(HmacSigner::new(fixtures::hmac_shared_secret())),
                VerificationKey::HmacSecret(fixtures::hmac_shared_secret()),
            ),
            TokenAlgorithm::Rs256 => (
                Arc::new(
                    RsaSigner::from_pkcs8(&fixtures::rsa_private_key_pkcs8())
                        .map_err(|e| anyhow::anyhow!("fixture RSA key rejected: {}", e))?,
                ),
                VerificationKey::RsaPem(fixtures::rsa_public_key_pem()),
            ),
        };

        Self::spawn_with_oracle(store, algorithm, oracle, key).await
    }

    /// Spawn a server whose signing oracle always fails but whose
    /// verifier still works, for issuance-fault tests.
    pub async fn spawn_with_failing_signer(
        store: MemoryClientStore,
    ) -> Result<Self, anyhow::Error> {
        Self::spawn_with_oracle(
            store,
            TokenAlgorithm::Hs256,
            Arc::new(FailingSigner),
            VerificationKey::HmacSecret(fixtures::hmac_shared_secret()),
        )
        .await
    }

    async fn spawn_with_oracle(
        store: MemoryClientStore,
        algorithm: TokenAlgorithm,
        oracle: Arc<dyn SigningOracle>,
        key: VerificationKey,
    ) -> Result<Self, anyhow::Error> {
        let issuer = TokenIssuer::new(oracle, TEST_ISSUER.to_string(), TEST_LIFETIME_SECONDS);
        let verifier = TokenVerifier::new(algorithm, &key, TEST_ISSUER)
            .map_err(|e| anyhow::anyhow!("verifier construction failed: {}", e))?;

        let state = Arc::new(AppState {
            store: Arc::new(store),
            issuer,
            verifier,
            metrics: None,
        });

        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Base URL of the spawned server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}
