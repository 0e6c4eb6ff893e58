use auth_service::config::{Config, KeyMaterial};
use auth_service::handlers::AppState;
use auth_service::oracle::{HmacSigner, RsaSigner, SigningOracle};
use auth_service::repositories::PgClientStore;
use auth_service::routes;
use auth_service::services::token_issuer::TokenIssuer;
use auth_service::services::token_verifier::{TokenVerifier, VerificationKey};
use metrics_exporter_prometheus::PrometheusBuilder;
use secrecy::{ExposeSecret, SecretBox};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting auth gateway");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(algorithm = %config.algorithm, "Configuration loaded successfully");

    // Initialize database connection pool
    info!("Connecting to database...");
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    info!("Database connection established");

    // Build the signing oracle and verification key for the configured
    // algorithm. Both sides are constructed from the same injected config;
    // there is no global key state.
    let (oracle, verification_key): (Arc<dyn SigningOracle>, VerificationKey) = match &config.keys
    {
        KeyMaterial::Rsa {
            signing_key_pkcs8,
            verification_key_pem,
        } => (
            Arc::new(RsaSigner::from_pkcs8(signing_key_pkcs8)?),
            VerificationKey::RsaPem(verification_key_pem.clone()),
        ),
        KeyMaterial::Hmac { shared_secret } => {
            warn!("Running in legacy HMAC shared-secret mode; prefer RS256");
            let signer_secret =
                SecretBox::new(Box::new(shared_secret.expose_secret().clone()));
            let verifier_secret =
                SecretBox::new(Box::new(shared_secret.expose_secret().clone()));
            (
                Arc::new(HmacSigner::new(signer_secret)),
                VerificationKey::HmacSecret(verifier_secret),
            )
        }
    };

    let issuer = TokenIssuer::new(
        oracle,
        config.issuer.clone(),
        config.token_lifetime_seconds,
    );
    let verifier = TokenVerifier::new(config.algorithm, &verification_key, &config.issuer)?;

    // Install the Prometheus recorder
    let metrics_handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        error!("Failed to install metrics recorder: {}", e);
        e
    })?;

    // Create application state
    let state = Arc::new(AppState {
        store: Arc::new(PgClientStore::new(db_pool)),
        issuer,
        verifier,
        metrics: Some(metrics_handle),
    });

    // Build application routes
    let app = routes::build_routes(state);

    // Parse bind address
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Auth gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
