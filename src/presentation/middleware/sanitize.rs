//! Body Sanitisation Middleware
//!
//! Rewrites JSON request bodies before they reach handlers:
//! keys that look like query operators (`$gt`, `a.b`) are dropped and
//! angle brackets in string values are HTML-escaped.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::shared::error::AppError;
use crate::startup::AppState;

fn is_operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Escape `<` and `>`.
pub fn escape_html(input: &str) -> String {
    if !input.contains(['<', '>']) {
        return input.to_string();
    }
    input.replace('<', "&lt;").replace('>', "&gt;")
}

/// Recursively strip operator keys and escape strings.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !is_operator_key(key))
                .map(|(key, value)| (key, sanitize_value(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::String(s) => Value::String(escape_html(&s)),
        other => other,
    }
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

/// Sanitise JSON bodies. Non-JSON requests pass through untouched.
pub async fn sanitize_body(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !is_json(&request) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match to_bytes(body, state.settings.http.json_body_limit).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return AppError::PayloadTooLarge("Request body too large".into()).into_response();
        }
    };

    // Malformed JSON is left for the handler's extractor to reject.
    let bytes = match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => match serde_json::to_vec(&sanitize_value(value)) {
            Ok(clean) => clean.into(),
            Err(_) => bytes,
        },
        Err(_) => bytes,
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    if let Ok(len) = HeaderValue::from_str(&bytes.len().to_string()) {
        parts.headers.insert(header::CONTENT_LENGTH, len);
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
