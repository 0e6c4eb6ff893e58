use crate::oracle::TokenAlgorithm;
use base64::{engine::general_purpose, Engine as _};
use secrecy::SecretBox;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default token lifetime: one hour. The lifetime is fixed by the issuer
/// and never taken from caller input.
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// Minimum shared-secret length for the legacy HMAC mode (256 bits).
pub const MIN_SHARED_SECRET_BYTES: usize = 32;

/// Bcrypt cost bounds for client-secret hashing.
pub const MIN_BCRYPT_COST: u32 = 10;
pub const MAX_BCRYPT_COST: u32 = 14;
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// Issuer identity placed in the `iss` claim (the gateway URL).
    pub issuer: String,
    pub token_lifetime_seconds: i64,
    pub algorithm: TokenAlgorithm,
    pub keys: KeyMaterial,
}

/// Key material for the configured algorithm family.
///
/// Loaded once at startup and injected into the issuer/verifier at
/// construction, never read from globals, so tests can substitute
/// fixture keys.
pub enum KeyMaterial {
    Rsa {
        /// PKCS#8 DER private key handed to the signing oracle.
        signing_key_pkcs8: SecretBox<Vec<u8>>,
        /// PEM-encoded public key used by the verifier.
        verification_key_pem: String,
    },
    Hmac {
        /// Shared secret used for both signing and verification.
        shared_secret: SecretBox<Vec<u8>>,
    },
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMaterial::Rsa { .. } => f
                .debug_struct("KeyMaterial::Rsa")
                .field("signing_key_pkcs8", &"[REDACTED]")
                .field("verification_key_pem", &"[public]")
                .finish(),
            KeyMaterial::Hmac { .. } => f
                .debug_struct("KeyMaterial::Hmac")
                .field("shared_secret", &"[REDACTED]")
                .finish(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(String),

    #[error("Shared secret too short: {got} bytes (minimum {min})")]
    WeakSharedSecret { got: usize, min: usize },

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let issuer = vars
            .get("TOKEN_ISSUER")
            .ok_or_else(|| ConfigError::MissingEnvVar("TOKEN_ISSUER".to_string()))?
            .clone();

        let token_lifetime_seconds = match vars.get("TOKEN_LIFETIME_SECONDS") {
            Some(raw) => {
                let parsed: i64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidLifetime(raw.clone()))?;
                if parsed <= 0 {
                    return Err(ConfigError::InvalidLifetime(raw.clone()));
                }
                parsed
            }
            None => DEFAULT_TOKEN_LIFETIME_SECONDS,
        };

        let algorithm = vars
            .get("TOKEN_ALGORITHM")
            .map(String::as_str)
            .unwrap_or("RS256")
            .parse::<TokenAlgorithm>()
            .map_err(ConfigError::InvalidAlgorithm)?;

        let keys = match algorithm {
            TokenAlgorithm::Rs256 => {
                let signing_key_b64 = vars
                    .get("SIGNING_KEY")
                    .ok_or_else(|| ConfigError::MissingEnvVar("SIGNING_KEY".to_string()))?;
                let signing_key_pkcs8 = general_purpose::STANDARD.decode(signing_key_b64)?;

                let verification_key_pem = vars
                    .get("VERIFICATION_KEY_PEM")
                    .ok_or_else(|| {
                        ConfigError::MissingEnvVar("VERIFICATION_KEY_PEM".to_string())
                    })?
                    .clone();

                KeyMaterial::Rsa {
                    signing_key_pkcs8: SecretBox::new(Box::new(signing_key_pkcs8)),
                    verification_key_pem,
                }
            }
            TokenAlgorithm::Hs256 => {
                let shared_secret_b64 = vars
                    .get("SHARED_SECRET")
                    .ok_or_else(|| ConfigError::MissingEnvVar("SHARED_SECRET".to_string()))?;
                let shared_secret = general_purpose::STANDARD.decode(shared_secret_b64)?;

                if shared_secret.len() < MIN_SHARED_SECRET_BYTES {
                    return Err(ConfigError::WeakSharedSecret {
                        got: shared_secret.len(),
                        min: MIN_SHARED_SECRET_BYTES,
                    });
                }

                KeyMaterial::Hmac {
                    shared_secret: SecretBox::new(Box::new(shared_secret)),
                }
            }
        };

        Ok(Config {
            database_url,
            bind_address,
            issuer,
            token_lifetime_seconds,
            algorithm,
            keys,
        })
    }
}
