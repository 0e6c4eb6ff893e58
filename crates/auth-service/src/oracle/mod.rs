//! Signing oracle abstraction.
//!
//! The gateway never holds private key material in its own logic: token
//! signatures are produced by a [`SigningOracle`], an object-safe capability
//! that turns a byte message into a signature. The production deployment
//! fronts an external signer; the implementations here keep the key inside
//! the oracle value and expose nothing but `sign`.

use crate::errors::AuthError;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use secrecy::{ExposeSecret, SecretBox};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

type HmacSha256 = Hmac<Sha256>;

/// Signature algorithm family for issued tokens.
///
/// A single verifier is parameterized by this value; there are no parallel
/// symmetric/asymmetric code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256. The standard mode.
    Rs256,
    /// HMAC-SHA256 shared-secret mode. Legacy interim mode only: both sides
    /// hold the same secret, so a verifier can also mint tokens.
    Hs256,
}

impl TokenAlgorithm {
    /// Name carried in the compact token header (`alg`).
    pub fn wire_name(&self) -> &'static str {
        match self {
            TokenAlgorithm::Rs256 => "RS256",
            TokenAlgorithm::Hs256 => "HS256",
        }
    }

    /// Algorithm identifier used by the external signing contract.
    pub fn signing_spec(&self) -> &'static str {
        match self {
            TokenAlgorithm::Rs256 => "RSASSA-PKCS1-v1_5-SHA256",
            TokenAlgorithm::Hs256 => "HMAC-SHA256",
        }
    }
}

impl fmt::Display for TokenAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TokenAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RS256" => Ok(TokenAlgorithm::Rs256),
            "HS256" => Ok(TokenAlgorithm::Hs256),
            _ => Err(format!("Unsupported token algorithm: {}", s)),
        }
    }
}

/// Capability that signs a byte message without revealing key material.
///
/// Implementations may perform network I/O; callers are expected to bound
/// every `sign` call with a timeout and treat expiry as a hard failure of
/// that single request.
#[async_trait]
pub trait SigningOracle: Send + Sync {
    /// Algorithm this oracle signs with.
    fn algorithm(&self) -> TokenAlgorithm;

    /// Sign `message`, returning the raw signature bytes.
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError>;
}

/// RSASSA-PKCS1-v1_5-SHA256 signer over a PKCS#8 private key.
///
/// The key pair is parsed once at construction and held privately; the DER
/// input is consumed into the ring key pair and not retained.
pub struct RsaSigner {
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl RsaSigner {
    pub fn from_pkcs8(pkcs8_der: &SecretBox<Vec<u8>>) -> Result<Self, AuthError> {
        let key_pair = RsaKeyPair::from_pkcs8(pkcs8_der.expose_secret()).map_err(|e| {
            AuthError::Crypto(format!("Invalid RSA private key format: {}", e))
        })?;

        Ok(Self {
            key_pair,
            rng: SystemRandom::new(),
        })
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("key_pair", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl SigningOracle for RsaSigner {
    fn algorithm(&self) -> TokenAlgorithm {
        TokenAlgorithm::Rs256
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(&RSA_PKCS1_SHA256, &self.rng, message, &mut signature)
            .map_err(|e| AuthError::SigningUnavailable(format!("RSA signing failed: {}", e)))?;

        Ok(signature)
    }
}

/// HMAC-SHA256 signer over a shared secret.
pub struct HmacSigner {
    secret: SecretBox<Vec<u8>>,
}

impl HmacSigner {
    pub fn new(secret: SecretBox<Vec<u8>>) -> Self {
        Self { secret }
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl SigningOracle for HmacSigner {
    fn algorithm(&self) -> TokenAlgorithm {
        TokenAlgorithm::Hs256
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret())
            .map_err(|e| AuthError::SigningUnavailable(format!("HMAC key rejected: {}", e)))?;
        mac.update(message);

        Ok(mac.finalize().into_bytes().to_vec())
    }
}
