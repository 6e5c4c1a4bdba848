//! Health and Metrics Endpoint Tests

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness() {
    let app = TestApp::new();

    let response = app.get("/health/live", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_store() {
    let app = TestApp::new();

    let response = app.get("/health/ready", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["database"]["status"], "healthy");
    assert!(response.body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_metrics_exposition() {
    let app = TestApp::new();
    app.get("/health", None).await;

    let response = app.get("/metrics", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let content_type = response.headers[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}
