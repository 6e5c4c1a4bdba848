//! Premium API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_plans_are_public() {
    let app = TestApp::new();

    let response = app.get("/api/v1/premium/plans", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["plans"],
        json!([
            { "plan": "monthly", "days": 30 },
            { "plan": "yearly", "days": 365 },
        ])
    );
}

#[tokio::test]
async fn test_private_room_requires_premium() {
    let app = TestApp::new();
    let user = app.signup().await;

    let refused = app.create_chatroom(&user.token, "secret", true).await;
    assert_eq!(refused.status, StatusCode::PAYMENT_REQUIRED);

    let subscribed = app
        .post(
            "/api/v1/premium/subscribe",
            json!({ "plan": "monthly" }),
            Some(&user.token),
        )
        .await;
    assert_eq!(subscribed.status, StatusCode::OK);
    assert_eq!(subscribed.body["premium"], true);
    assert!(subscribed.body["premium_until"].as_str().is_some());

    let created = app.create_chatroom(&user.token, "secret", true).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["private"], true);
}

#[tokio::test]
async fn test_private_rooms_are_hidden_and_closed_to_outsiders() {
    let app = TestApp::new();
    let owner = app.signup().await;
    let outsider = app.signup().await;

    app.post(
        "/api/v1/premium/subscribe",
        json!({ "plan": "yearly" }),
        Some(&owner.token),
    )
    .await;
    let room = app.create_chatroom(&owner.token, "hideout", true).await;
    let room_id = room.body["id"].as_str().unwrap().to_string();
    app.create_chatroom(&owner.token, "plaza", false).await;

    let visible = app.get("/api/v1/chatrooms", Some(&outsider.token)).await;
    assert_eq!(visible.body["results"], 1);
    assert_eq!(visible.body["data"][0]["name"], "plaza");

    let join = app
        .post(
            &format!("/api/v1/chatrooms/{}/join", room_id),
            json!({}),
            Some(&outsider.token),
        )
        .await;
    assert_eq!(join.status, StatusCode::FORBIDDEN);

    let owner_view = app.get("/api/v1/chatrooms", Some(&owner.token)).await;
    assert_eq!(owner_view.body["results"], 2);
}

#[tokio::test]
async fn test_free_accounts_hit_room_limit() {
    let app = TestApp::new();
    let user = app.signup().await;

    for name in ["one", "two", "three"] {
        let created = app.create_chatroom(&user.token, name, false).await;
        assert_eq!(created.status, StatusCode::CREATED);
    }

    let fourth = app.create_chatroom(&user.token, "four", false).await;
    assert_eq!(fourth.status, StatusCode::PAYMENT_REQUIRED);

    app.post(
        "/api/v1/premium/subscribe",
        json!({ "plan": "monthly" }),
        Some(&user.token),
    )
    .await;
    let after_upgrade = app.create_chatroom(&user.token, "four", false).await;
    assert_eq!(after_upgrade.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_status_and_cancel() {
    let app = TestApp::new();
    let user = app.signup().await;

    let status = app.get("/api/v1/premium/status", Some(&user.token)).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["premium"], false);

    app.post(
        "/api/v1/premium/subscribe",
        json!({ "plan": "monthly" }),
        Some(&user.token),
    )
    .await;
    let cancelled = app.delete("/api/v1/premium/subscribe", &user.token).await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["premium"], false);

    let me = app.get("/api/v1/users/me", Some(&user.token)).await;
    assert_eq!(me.body["premium"], false);
}

#[tokio::test]
async fn test_unknown_plan_is_rejected() {
    let app = TestApp::new();
    let user = app.signup().await;

    let response = app
        .post(
            "/api/v1/premium/subscribe",
            json!({ "plan": "lifetime" }),
            Some(&user.token),
        )
        .await;

    assert!(response.status.is_client_error());
}
