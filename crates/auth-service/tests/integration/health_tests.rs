//! Integration tests for the health and metrics endpoints.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use auth_test_utils::store::MemoryClientStore;
use auth_test_utils::TestAuthServer;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryClientStore::new()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn metrics_endpoint_responds() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryClientStore::new()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    // Test servers run without an installed recorder; the endpoint still
    // answers with an empty exposition.
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
