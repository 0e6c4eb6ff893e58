//! Integration tests for the per-request authorizer endpoint.
//!
//! The authorizer must always answer 200 with a well-formed policy
//! document; every verification failure renders as Deny.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use auth_service::oracle::TokenAlgorithm;
use auth_test_utils::fixtures;
use auth_test_utils::server_harness::hmac_test_issuer;
use auth_test_utils::store::MemoryClientStore;
use auth_test_utils::TestAuthServer;
use reqwest::StatusCode;
use serde_json::{json, Value};

const SECRET: &str = "acme-client-secret";
const RESOURCE: &str = "arn:gateway:execute/orders/GET";

fn acme_store() -> MemoryClientStore {
    MemoryClientStore::new().with_client("acme", SECRET, &["read", "write"])
}

async fn obtain_token(server: &TestAuthServer, scope: &str) -> String {
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/oauth/token", server.url()))
        .json(&json!({
            "client_id": "acme",
            "client_secret": SECRET,
            "scope": scope
        }))
        .send()
        .await
        .expect("token request sends");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("token response is JSON");
    body["access_token"].as_str().expect("token present").to_string()
}

async fn authorize(server: &TestAuthServer, authorization_token: &str) -> Value {
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/authorize", server.url()))
        .json(&json!({
            "authorizationToken": authorization_token,
            "resource": RESOURCE
        }))
        .send()
        .await
        .expect("authorize request sends");

    // The authorizer never errors; failures are Deny documents.
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("authorize response is JSON")
}

fn effect_of(body: &Value) -> &str {
    body["policyDocument"]["Statement"][0]["Effect"]
        .as_str()
        .expect("policy document carries an effect")
}

/// Scenario: a well-formed, unexpired, correctly signed token for client
/// "acme" with scope "read write" is allowed, and the scope string rides
/// along as context under `permissions`.
#[tokio::test]
async fn valid_token_is_allowed_with_scope_context() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;
    let token = obtain_token(&server, "read write").await;

    let body = authorize(&server, &format!("Bearer {}", token)).await;

    assert_eq!(body["principalId"], "acme");
    assert_eq!(effect_of(&body), "Allow");
    assert_eq!(body["policyDocument"]["Version"], "2012-10-17");
    assert_eq!(
        body["policyDocument"]["Statement"][0]["Action"][0],
        "execute-api:Invoke"
    );
    assert_eq!(
        body["policyDocument"]["Statement"][0]["Resource"][0],
        RESOURCE
    );
    assert_eq!(body["context"]["permissions"], "read write");

    Ok(())
}

/// Scenario: an expired bearer token is denied.
#[tokio::test]
async fn expired_token_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    // Issued two hours ago with a one-hour lifetime: expired, but signed
    // with the right key.
    let issuer = hmac_test_issuer();
    let now = chrono::Utc::now().timestamp();
    let token = issuer
        .issue("acme", &["read".to_string()], now - 7200)
        .await
        .map_err(|e| anyhow::anyhow!("fixture issuance failed: {}", e))?;

    let body = authorize(&server, &format!("Bearer {}", token)).await;

    assert_eq!(effect_of(&body), "Deny");
    assert_eq!(body["principalId"], "");
    assert!(body.get("context").is_none());

    Ok(())
}

#[tokio::test]
async fn tampered_token_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;
    let token = obtain_token(&server, "read").await;

    for segment in [1, 2] {
        let tampered = fixtures::flip_bit_in_segment(&token, segment);
        let body = authorize(&server, &format!("Bearer {}", tampered)).await;
        assert_eq!(
            effect_of(&body),
            "Deny",
            "tampering segment {} must deny",
            segment
        );
    }

    Ok(())
}

#[tokio::test]
async fn missing_or_non_bearer_authorization_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    for bad in ["", "Basic YWNtZTpzM2NyZXQ=", "Bearer", "just-a-token"] {
        let body = authorize(&server, bad).await;
        assert_eq!(effect_of(&body), "Deny", "{:?} must deny", bad);
        assert_eq!(body["principalId"], "");
    }

    Ok(())
}

#[tokio::test]
async fn garbage_token_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let body = authorize(&server, "Bearer not.a-real.token").await;
    assert_eq!(effect_of(&body), "Deny");

    Ok(())
}

/// A token signed under the symmetric key but presented to an RS256
/// deployment is denied by the algorithm pin alone.
#[tokio::test]
async fn algorithm_substitution_is_denied() -> Result<(), anyhow::Error> {
    let server =
        TestAuthServer::spawn_with_algorithm(acme_store(), TokenAlgorithm::Rs256).await?;

    let issuer = hmac_test_issuer();
    let now = chrono::Utc::now().timestamp();
    let token = issuer
        .issue("acme", &["read".to_string()], now)
        .await
        .map_err(|e| anyhow::anyhow!("fixture issuance failed: {}", e))?;

    let body = authorize(&server, &format!("Bearer {}", token)).await;
    assert_eq!(effect_of(&body), "Deny");

    Ok(())
}

/// A valid token carrying no scopes is allowed but gets no context map.
#[tokio::test]
async fn scopeless_token_is_allowed_without_context() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;
    let token = obtain_token(&server, "").await;

    let body = authorize(&server, &format!("Bearer {}", token)).await;

    assert_eq!(effect_of(&body), "Allow");
    assert_eq!(body["principalId"], "acme");
    assert!(body.get("context").is_none());

    Ok(())
}

/// End-to-end allow in RS256 mode: issue and authorize against the same
/// RSA-configured deployment.
#[tokio::test]
async fn rs256_round_trip_is_allowed() -> Result<(), anyhow::Error> {
    let server =
        TestAuthServer::spawn_with_algorithm(acme_store(), TokenAlgorithm::Rs256).await?;
    let token = obtain_token(&server, "read").await;

    let body = authorize(&server, &format!("Bearer {}", token)).await;

    assert_eq!(effect_of(&body), "Allow");
    assert_eq!(body["context"]["permissions"], "read");

    Ok(())
}
