//! Integration tests for the OAuth 2.0 token endpoint.
//!
//! Each test spawns a real gateway instance backed by an in-memory client
//! store and fixture keys, then drives it over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use auth_service::oracle::TokenAlgorithm;
use auth_test_utils::assertions::TokenAssertions;
use auth_test_utils::server_harness::{TEST_ISSUER, TEST_LIFETIME_SECONDS};
use auth_test_utils::store::MemoryClientStore;
use auth_test_utils::TestAuthServer;
use reqwest::StatusCode;
use serde_json::{json, Value};

const SECRET: &str = "acme-client-secret";

fn acme_store() -> MemoryClientStore {
    MemoryClientStore::new().with_client("acme", SECRET, &["read", "write"])
}

async fn post_token(server: &TestAuthServer, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/v1/oauth/token", server.url()))
        .json(&body)
        .send()
        .await
        .expect("token request sends")
}

/// Scenario: client `acme` with allowed scopes {read, write} requests
/// {read}. Issuance succeeds and the decoded claims carry scope "read".
#[tokio::test]
async fn issues_token_for_valid_credentials_and_scope_subset() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = post_token(
        &server,
        json!({
            "grant_type": "client_credentials",
            "client_id": "acme",
            "client_secret": SECRET,
            "scope": "read"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], TEST_LIFETIME_SECONDS);
    assert_eq!(body["scope"], "read");

    let token = body["access_token"]
        .as_str()
        .expect("access_token present")
        .to_string();
    token
        .assert_valid_compact_token()
        .assert_algorithm("HS256")
        .assert_for_client("acme")
        .assert_issued_by(TEST_ISSUER)
        .assert_has_scope("read")
        .assert_lifetime(TEST_LIFETIME_SECONDS);

    Ok(())
}

/// Scenario: client `acme` requests scope {delete}, which is not in its
/// allow-list. Issuance returns 401 and no token is produced.
#[tokio::test]
async fn rejects_scope_outside_allow_list() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = post_token(
        &server,
        json!({
            "client_id": "acme",
            "client_secret": SECRET,
            "scope": "delete"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert!(body.get("access_token").is_none());
    assert_eq!(body["error"]["code"], "INVALID_CLIENT");

    Ok(())
}

/// Unknown client and wrong secret must be indistinguishable to the
/// caller: same status, same body.
#[tokio::test]
async fn unknown_client_and_wrong_secret_render_identically() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let unknown = post_token(
        &server,
        json!({"client_id": "ghost", "client_secret": SECRET}),
    )
    .await;
    let unknown_status = unknown.status();
    let unknown_body: Value = unknown.json().await?;

    let wrong = post_token(
        &server,
        json!({"client_id": "acme", "client_secret": "wrong-secret"}),
    )
    .await;
    let wrong_status = wrong.status();
    let wrong_body: Value = wrong.json().await?;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, wrong_body);

    Ok(())
}

#[tokio::test]
async fn accepts_form_encoded_body() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/oauth/token", server.url()))
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", "acme"),
            ("client_secret", SECRET),
            ("scope", "read write"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["scope"], "read write");

    Ok(())
}

#[tokio::test]
async fn accepts_comma_separated_scope() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = post_token(
        &server,
        json!({
            "client_id": "acme",
            "client_secret": SECRET,
            "scope": "read,write"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["scope"], "read write");

    Ok(())
}

#[tokio::test]
async fn accepts_basic_auth_credentials() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/oauth/token", server.url()))
        .basic_auth("acme", Some(SECRET))
        .form(&[("grant_type", "client_credentials"), ("scope", "read")])
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn empty_scope_issues_token_without_scopes() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = post_token(
        &server,
        json!({"client_id": "acme", "client_secret": SECRET}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["scope"], "");

    Ok(())
}

#[tokio::test]
async fn missing_credentials_are_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = post_token(&server, json!({"client_id": "acme"})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn malformed_json_body_is_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/oauth/token", server.url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");

    Ok(())
}

#[tokio::test]
async fn unsupported_grant_type_is_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(acme_store()).await?;

    let response = post_token(
        &server,
        json!({
            "grant_type": "password",
            "client_id": "acme",
            "client_secret": SECRET
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Store transport faults are server-side failures, distinct from 401s,
/// so operators can tell "unauthorized" from "unavailable".
#[tokio::test]
async fn store_fault_is_internal_server_error() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryClientStore::failing("connection refused")).await?;

    let response = post_token(
        &server,
        json!({"client_id": "acme", "client_secret": SECRET}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "STORE_ERROR");

    Ok(())
}

#[tokio::test]
async fn signing_fault_is_internal_server_error() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_failing_signer(acme_store()).await?;

    let response = post_token(
        &server,
        json!({"client_id": "acme", "client_secret": SECRET, "scope": "read"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "SIGNING_ERROR");

    Ok(())
}

/// A client record whose persisted scope set is not valid JSON is a local
/// data-integrity fault, not a caller error.
#[tokio::test]
async fn corrupt_client_record_is_internal_server_error() -> Result<(), anyhow::Error> {
    let store = MemoryClientStore::new().with_raw_client(
        "broken",
        auth_test_utils::fixtures::test_secret_hash(SECRET),
        "read,write".to_string(),
    );
    let server = TestAuthServer::spawn(store).await?;

    let response = post_token(
        &server,
        json!({"client_id": "broken", "client_secret": SECRET}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

/// Full RS256 mode: issue over the fixture RSA key and verify the header
/// declares RS256.
#[tokio::test]
async fn rs256_mode_issues_rsa_signed_tokens() -> Result<(), anyhow::Error> {
    let server =
        TestAuthServer::spawn_with_algorithm(acme_store(), TokenAlgorithm::Rs256).await?;

    let response = post_token(
        &server,
        json!({"client_id": "acme", "client_secret": SECRET, "scope": "read"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    let token = body["access_token"].as_str().unwrap().to_string();
    token
        .assert_valid_compact_token()
        .assert_algorithm("RS256")
        .assert_for_client("acme");

    Ok(())
}
