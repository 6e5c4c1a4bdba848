//! Middleware Stack Tests

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{test_settings, TestApp};

/// Request from peer `peer`, claiming to be `forwarded_for`.
fn from_peer(uri: &str, peer: &str, forwarded_for: &str) -> Request<Body> {
    let mut request = Request::builder()
        .uri(uri)
        .header("x-forwarded-for", forwarded_for)
        .body(Body::empty())
        .unwrap();
    let addr: SocketAddr = format!("{}:40000", peer).parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::new();

    for uri in ["/health", "/api/v1/premium/plans", "/api/v1/users/me"] {
        let response = app.get(uri, None).await;
        let headers = &response.headers;

        assert_eq!(headers["x-content-type-options"], "nosniff", "{}", uri);
        assert_eq!(headers["x-frame-options"], "SAMEORIGIN", "{}", uri);
        assert_eq!(headers["referrer-policy"], "no-referrer", "{}", uri);
        assert!(headers.contains_key("content-security-policy"), "{}", uri);
        assert!(!headers.contains_key("strict-transport-security"), "{}", uri);
    }
}

#[tokio::test]
async fn test_hsts_in_production() {
    let mut settings = test_settings();
    settings.environment = "production".into();
    let app = TestApp::with_settings(settings);

    let response = app.get("/health", None).await;

    assert!(response.headers.contains_key("strict-transport-security"));
}

#[tokio::test]
async fn test_api_rate_limit_per_peer() {
    let mut settings = test_settings();
    settings.rate_limit.max_requests = 2;
    let app = TestApp::with_settings(settings);

    for _ in 0..2 {
        let ok = app
            .send(from_peer("/api/v1/premium/plans", "192.0.2.1", "10.0.0.1"))
            .await;
        assert_eq!(ok.status, StatusCode::OK);
        assert!(ok.headers.contains_key("x-ratelimit-remaining"));
    }

    let limited = app
        .send(from_peer("/api/v1/premium/plans", "192.0.2.1", "10.0.0.1"))
        .await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers.contains_key(header::RETRY_AFTER));

    let other_peer = app
        .send(from_peer("/api/v1/premium/plans", "192.0.2.2", "10.0.0.1"))
        .await;
    assert_eq!(other_peer.status, StatusCode::OK);

    let health = app.send(from_peer("/health", "192.0.2.1", "10.0.0.1")).await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn test_rotating_forwarded_for_does_not_reset_limit() {
    let mut settings = test_settings();
    settings.rate_limit.max_requests = 2;
    let app = TestApp::with_settings(settings);

    let mut statuses = Vec::new();
    for i in 0..5 {
        let forged = format!("10.9.9.{}", i);
        let response = app
            .send(from_peer("/api/v1/premium/plans", "192.0.2.1", &forged))
            .await;
        statuses.push(response.status);
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
}

#[tokio::test]
async fn test_forwarded_for_keys_clients_behind_trusted_proxy() {
    let mut settings = test_settings();
    settings.rate_limit.max_requests = 1;
    settings.rate_limit.trust_proxy_headers = true;
    let app = TestApp::with_settings(settings);

    let first = app
        .send(from_peer("/api/v1/premium/plans", "192.0.2.1", "10.0.0.1"))
        .await;
    let second_client = app
        .send(from_peer("/api/v1/premium/plans", "192.0.2.1", "10.0.0.2"))
        .await;
    let first_again = app
        .send(from_peer("/api/v1/premium/plans", "192.0.2.1", "10.0.0.1"))
        .await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second_client.status, StatusCode::OK);
    assert_eq!(first_again.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_json_strings_are_html_escaped() {
    let app = TestApp::new();
    let user = app.signup().await;

    let response = app
        .post(
            "/api/v1/chatrooms",
            json!({
                "name": "escaped",
                "description": "<script>alert(1)</script>",
            }),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.body["description"],
        "&lt;script&gt;alert(1)&lt;/script&gt;"
    );
}

#[tokio::test]
async fn test_operator_keys_never_reach_handlers() {
    let app = TestApp::new();
    let user = app.signup().await;

    let response = app
        .post(
            "/api/v1/users/login",
            json!({ "email": { "$gt": "" }, "password": { "$ne": null } }),
            None,
        )
        .await;

    assert!(response.status.is_client_error());
    assert!(response.body.get("token").is_none());

    let me = app.get("/api/v1/users/me", Some(&user.token)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_json_body_is_rejected() {
    let app = TestApp::new();
    let user = app.signup().await;

    let response = app
        .post(
            "/api/v1/chatrooms",
            json!({ "name": "huge", "description": "a".repeat(20 * 1024) }),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.body["message"], "Request body too large");
}

#[tokio::test]
async fn test_repeated_query_parameters_keep_the_last() {
    let app = TestApp::new();
    let user = app.signup().await;
    let room = app.create_chatroom(&user.token, "polluted", false).await;
    let room_id = room.body["id"].as_str().unwrap();

    let response = app
        .get(
            &format!("/api/v1/messages?chatroom=bogus&chatroom={}", room_id),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["results"], 0);
}

#[tokio::test]
async fn test_list_responses_carry_request_time() {
    let app = TestApp::new();
    let user = app.signup().await;

    let response = app.get("/api/v1/chatrooms", Some(&user.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["requested_at"].as_str().is_some());
}
