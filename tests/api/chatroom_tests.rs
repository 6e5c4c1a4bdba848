//! Chatroom and Message API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_chatroom_makes_owner_a_member() {
    let app = TestApp::new();
    let owner = app.signup().await;

    let created = app.create_chatroom(&owner.token, "general", false).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["owner_id"], owner.id);
    assert_eq!(created.body["private"], false);

    let room_id = created.body["id"].as_str().unwrap();
    let members = app
        .get(&format!("/api/v1/chatrooms/{}/members", room_id), Some(&owner.token))
        .await;
    assert_eq!(members.status, StatusCode::OK);
    assert_eq!(members.body["results"], 1);
    assert_eq!(members.body["data"][0]["user_id"], owner.id);
}

#[tokio::test]
async fn test_chatroom_names_are_unique_ignoring_case() {
    let app = TestApp::new();
    let owner = app.signup().await;

    app.create_chatroom(&owner.token, "Lobby", false).await;
    let duplicate = app.create_chatroom(&owner.token, "lobby", false).await;

    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_chatroom_name_length_is_validated() {
    let app = TestApp::new();
    let owner = app.signup().await;

    let response = app.create_chatroom(&owner.token, "x", false).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_chatroom_name_is_rejected_after_trimming() {
    let app = TestApp::new();
    let owner = app.signup().await;

    let blank = app.create_chatroom(&owner.token, "     ", false).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.body["message"], "Chatroom name must be 2-50 characters");

    let room = app.create_chatroom(&owner.token, "  padded  ", false).await;
    assert_eq!(room.status, StatusCode::CREATED);
    assert_eq!(room.body["name"], "padded");

    let rename = app
        .patch(
            &format!("/api/v1/chatrooms/{}", room.body["id"].as_str().unwrap()),
            json!({ "name": "  " }),
            &owner.token,
        )
        .await;
    assert_eq!(rename.status, StatusCode::BAD_REQUEST);

    let rooms = app.get("/api/v1/chatrooms", Some(&owner.token)).await;
    assert_eq!(rooms.body["results"], 1);
}

#[tokio::test]
async fn test_join_post_and_read_history() {
    let app = TestApp::new();
    let owner = app.signup().await;
    let guest = app.signup().await;

    let room = app.create_chatroom(&owner.token, "random", false).await;
    let room_id = room.body["id"].as_str().unwrap().to_string();

    let before_join = app
        .post(
            "/api/v1/messages",
            json!({ "chatroom": room_id, "content": "hello?" }),
            Some(&guest.token),
        )
        .await;
    assert_eq!(before_join.status, StatusCode::FORBIDDEN);

    let joined = app
        .post(
            &format!("/api/v1/chatrooms/{}/join", room_id),
            json!({}),
            Some(&guest.token),
        )
        .await;
    assert_eq!(joined.status, StatusCode::OK);
    assert_eq!(joined.body["user_id"], guest.id);

    for content in ["first", "second", "third"] {
        let posted = app
            .post(
                "/api/v1/messages",
                json!({ "chatroom": room_id, "content": content }),
                Some(&guest.token),
            )
            .await;
        assert_eq!(posted.status, StatusCode::CREATED);
    }

    let history = app
        .get(
            &format!("/api/v1/messages?chatroom={}", room_id),
            Some(&owner.token),
        )
        .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body["results"], 3);
    assert_eq!(history.body["data"][0]["content"], "third");

    let page = app
        .get(
            &format!("/api/v1/messages?chatroom={}&limit=1", room_id),
            Some(&owner.token),
        )
        .await;
    assert_eq!(page.body["results"], 1);
}

#[tokio::test]
async fn test_only_author_edits_and_owner_may_delete() {
    let app = TestApp::new();
    let owner = app.signup().await;
    let author = app.signup().await;
    let bystander = app.signup().await;

    let room = app.create_chatroom(&owner.token, "moderated", false).await;
    let room_id = room.body["id"].as_str().unwrap().to_string();
    for user in [&author, &bystander] {
        app.post(
            &format!("/api/v1/chatrooms/{}/join", room_id),
            json!({}),
            Some(&user.token),
        )
        .await;
    }

    let posted = app
        .post(
            "/api/v1/messages",
            json!({ "chatroom": room_id, "content": "original" }),
            Some(&author.token),
        )
        .await;
    let message_uri = format!("/api/v1/messages/{}", posted.body["id"].as_str().unwrap());

    let foreign_edit = app
        .patch(&message_uri, json!({ "content": "hijacked" }), &owner.token)
        .await;
    assert_eq!(foreign_edit.status, StatusCode::FORBIDDEN);

    let edit = app
        .patch(&message_uri, json!({ "content": "revised" }), &author.token)
        .await;
    assert_eq!(edit.status, StatusCode::OK);
    assert_eq!(edit.body["content"], "revised");
    assert_eq!(edit.body["edited"], true);

    let foreign_delete = app.delete(&message_uri, &bystander.token).await;
    assert_eq!(foreign_delete.status, StatusCode::FORBIDDEN);

    let owner_delete = app.delete(&message_uri, &owner.token).await;
    assert_eq!(owner_delete.status, StatusCode::NO_CONTENT);

    let gone = app.get(&message_uri, Some(&author.token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_cannot_leave_but_members_can() {
    let app = TestApp::new();
    let owner = app.signup().await;
    let guest = app.signup().await;

    let room = app.create_chatroom(&owner.token, "transient", false).await;
    let room_id = room.body["id"].as_str().unwrap().to_string();
    let leave_uri = format!("/api/v1/chatrooms/{}/leave", room_id);

    let owner_leave = app.post(&leave_uri, json!({}), Some(&owner.token)).await;
    assert_eq!(owner_leave.status, StatusCode::FORBIDDEN);

    let not_member = app.post(&leave_uri, json!({}), Some(&guest.token)).await;
    assert_eq!(not_member.status, StatusCode::FORBIDDEN);

    app.post(
        &format!("/api/v1/chatrooms/{}/join", room_id),
        json!({}),
        Some(&guest.token),
    )
    .await;
    let left = app.post(&leave_uri, json!({}), Some(&guest.token)).await;
    assert_eq!(left.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_only_owner_updates_and_deletes_room() {
    let app = TestApp::new();
    let owner = app.signup().await;
    let other = app.signup().await;

    let room = app.create_chatroom(&owner.token, "renamable", false).await;
    let room_uri = format!("/api/v1/chatrooms/{}", room.body["id"].as_str().unwrap());

    let foreign = app
        .patch(&room_uri, json!({ "name": "stolen" }), &other.token)
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let renamed = app
        .patch(&room_uri, json!({ "name": "renamed" }), &owner.token)
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "renamed");

    let foreign_delete = app.delete(&room_uri, &other.token).await;
    assert_eq!(foreign_delete.status, StatusCode::FORBIDDEN);

    let deleted = app.delete(&room_uri, &owner.token).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.get(&room_uri, Some(&owner.token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_chatroom_is_not_found() {
    let app = TestApp::new();
    let user = app.signup().await;

    let response = app.get("/api/v1/chatrooms/42", Some(&user.token)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
