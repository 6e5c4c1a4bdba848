//! Registration Wizard API Tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::common::TestApp;

#[tokio::test]
async fn test_steps_lists_catalogue_in_order() {
    let app = TestApp::new();

    let response = app.get("/api/v1/users/signup/steps", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let steps = response.body.as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["optional"], false);
    assert_eq!(steps[1]["optional"], true);
    assert_eq!(steps[2]["optional"], false);
    assert_eq!(steps[0]["content"]["kind"], "account_form");
    assert_eq!(steps[1]["content"]["kind"], "photo_upload");
}

#[test_case(0, "account_submitted", 1 ; "account form advances")]
#[test_case(1, "photo_chosen", 2 ; "photo upload advances")]
#[test_case(1, "skipped", 2 ; "optional photo step can be skipped")]
#[tokio::test]
async fn test_transition_moves_forward(from: usize, event: &str, to: usize) {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/users/signup/step",
            json!({ "activeStep": from, "skippedSteps": [], "event": event }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["activeStep"], to);
}

#[tokio::test]
async fn test_skipping_photo_records_skip_and_hides_completion() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/users/signup/step",
            json!({ "activeStep": 1, "event": "skipped" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["skippedSteps"], json!([1]));
    assert_eq!(response.body["canSkip"], false);
    assert_eq!(response.body["steps"][0]["completed"], true);
    assert_eq!(response.body["steps"][1]["completed"], false);
    assert_eq!(response.body["steps"][2]["active"], true);
}

#[tokio::test]
async fn test_skipping_required_step_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/users/signup/step",
            json!({ "activeStep": 0, "event": "skipped" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "You can't skip a step that isn't optional."
    );
}

#[test_case(json!({ "activeStep": 7, "event": "skipped" }) ; "step out of range")]
#[test_case(json!({ "activeStep": 0, "event": "photo_chosen" }) ; "event from another step")]
#[test_case(json!({ "activeStep": 2, "skippedSteps": [0], "event": "skipped" }) ; "required step recorded as skipped")]
#[test_case(json!({ "activeStep": 2, "skippedSteps": [7], "event": "account_submitted" }) ; "skip record outside catalogue")]
#[tokio::test]
async fn test_invalid_transitions_are_bad_requests(body: serde_json::Value) {
    let app = TestApp::new();

    let response = app.post("/api/v1/users/signup/step", body, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test_case(false, "skip" ; "without photo offers skip")]
#[test_case(true, "next" ; "with photo offers next")]
#[tokio::test]
async fn test_optional_action_follows_photo(user_photo: bool, action: &str) {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/users/signup/step",
            json!({ "activeStep": 0, "userPhoto": user_photo, "event": "account_submitted" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["optionalAction"], action);
}

#[tokio::test]
async fn test_complete_with_session_redirects_home() {
    let app = TestApp::new();
    let user = app.signup().await;

    let response = app
        .post(
            "/api/v1/users/signup/complete",
            json!({ "activeStep": 2, "skippedSteps": [1] }),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["outcome"], "redirected");
    assert_eq!(response.body["path"], "/");
    assert_eq!(response.body["steps"][1]["completed"], false);
}

#[tokio::test]
async fn test_complete_with_session_cookie_redirects_home() {
    let app = TestApp::new();
    let user = app.signup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/signup/complete")
        .header(header::COOKIE, format!("jwt={}", user.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "activeStep": 2 }).to_string()))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["outcome"], "redirected");
}

#[tokio::test]
async fn test_complete_without_session_notifies_error() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/users/signup/complete",
            json!({ "activeStep": 2 }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["outcome"], "notified");
    assert_eq!(response.body["level"], "error");
    assert!(response.body.get("path").is_none());
}

#[tokio::test]
async fn test_complete_before_final_step_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/users/signup/complete",
            json!({ "activeStep": 1 }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
