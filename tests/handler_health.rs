mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use short_url::domain::entities::{NewLink, ShortLink};
use short_url::domain::repositories::LinkRepository;
use short_url::error::AppError;
use std::sync::Arc;

/// Store whose every call fails as if the database were down.
struct UnreachableRepository;

fn unreachable_error() -> AppError {
    AppError::unavailable("Database unavailable", json!({}))
}

#[async_trait]
impl LinkRepository for UnreachableRepository {
    async fn find_by_code(&self, _code: &str) -> Result<Option<ShortLink>, AppError> {
        Err(unreachable_error())
    }

    async fn insert(&self, _new_link: NewLink) -> Result<ShortLink, AppError> {
        Err(unreachable_error())
    }

    async fn update(&self, _code: &str, _long_url: &str) -> Result<ShortLink, AppError> {
        Err(unreachable_error())
    }

    async fn delete_by_code(&self, _code: &str) -> Result<bool, AppError> {
        Err(unreachable_error())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(unreachable_error())
    }
}

#[tokio::test]
async fn test_health_check_ok() {
    let server = common::create_test_server();
    common::shorten(&server, "http://example.com").await;

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert_eq!(body["checks"]["store"]["message"], "Connected, 1 links");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_check_degraded() {
    let state = common::create_test_state_with(Arc::new(UnreachableRepository));
    let server = common::create_test_server_with(state);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["store"]["status"], "error");
}

#[tokio::test]
async fn test_health_post_is_not_found() {
    let server = common::create_test_server();

    server.post("/health").await.assert_status_not_found();
}

#[tokio::test]
async fn test_store_outage_maps_to_service_unavailable() {
    let state = common::create_test_state_with(Arc::new(UnreachableRepository));
    let server = common::create_test_server_with(state);

    let shorten = server.get("/shorten?url=http://example.com").await;
    shorten.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body = shorten.json::<serde_json::Value>();
    assert_eq!(body["error"]["message"], "Database unavailable");

    server
        .get("/abcd1234")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
