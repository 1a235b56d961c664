//! Integration tests for API key authentication.

mod helpers;

use axum::http::StatusCode;

use helpers::{API_KEY, TestApp};

#[tokio::test]
async fn test_missing_or_wrong_key_is_unauthorized() {
    let app = TestApp::new().await;

    let r = app
        .request_with_key("POST", "/upload/init", None, None)
        .await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);
    assert_eq!(r.body["error"], "UNAUTHORIZED");

    let r = app
        .request_with_key("GET", "/unzip/status?job_id=x", None, Some("wrong-key"))
        .await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);

    let r = app
        .request_with_key("POST", "/upload/init", None, Some(API_KEY))
        .await;
    assert_eq!(r.status, StatusCode::OK);
}

#[tokio::test]
async fn test_custom_header_name() {
    let app = TestApp::with_config(|c| c.auth.header = "x-unpackd-token".into()).await;

    let r = app.request("POST", "/upload/init", None).await;
    assert_eq!(r.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unset_key_is_server_error() {
    let app = TestApp::with_config(|c| c.auth.api_key.clear()).await;

    let r = app
        .request_with_key("POST", "/upload/init", None, Some(""))
        .await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body["error"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_healthz_is_open() {
    let app = TestApp::with_config(|c| c.auth.api_key.clear()).await;

    let r = app.request_with_key("GET", "/healthz", None, None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["ok"], true);
    assert_eq!(r.body["uploads"], 0);
    assert_eq!(r.body["jobs"], 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;
    let r = app.request("GET", "/upload/everything", None).await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
}
