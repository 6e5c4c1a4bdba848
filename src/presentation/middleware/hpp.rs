//! HTTP Parameter Pollution Guard
//!
//! Repeated query parameters collapse to their last value unless the name is
//! whitelisted.

use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::{uri::PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};

use crate::startup::AppState;

/// Collapse a raw query string.
pub fn collapse_query(query: &str, whitelist: &[String]) -> String {
    let pairs: Vec<(&str, &str)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();

    let mut last_seen: HashMap<&str, usize> = HashMap::new();
    for (index, (key, _)) in pairs.iter().enumerate() {
        last_seen.insert(*key, index);
    }

    pairs
        .iter()
        .enumerate()
        .filter(|(index, (key, _))| {
            whitelist.iter().any(|w| w == key) || last_seen.get(key) == Some(index)
        })
        .map(|(_, (key, value))| {
            if value.is_empty() {
                key.to_string()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn rewrite_uri(uri: &Uri, query: &str) -> Option<Uri> {
    let path_and_query = if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), query)
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

pub async fn hpp_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(query) = request.uri().query() {
        let collapsed = collapse_query(query, &state.settings.http.hpp_whitelist);
        if collapsed != query {
            match rewrite_uri(request.uri(), &collapsed) {
                Some(uri) => *request.uri_mut() = uri,
                None => tracing::warn!(query = %query, "Could not rewrite polluted query"),
            }
        }
    }

    next.run(request).await
}
