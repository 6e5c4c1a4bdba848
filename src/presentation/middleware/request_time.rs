//! Request timestamp extension.

use axum::{extract::Request, middleware::Next, response::Response};
use chrono::{DateTime, Utc};

/// When the request entered the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTime(pub DateTime<Utc>);

pub async fn stamp_request_time(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(RequestTime(Utc::now()));
    next.run(request).await
}
