//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod auth;
pub mod chatroom;
pub mod health;
pub mod message;
pub mod premium;
pub mod signup;
pub mod user;

use crate::shared::error::AppError;

/// Parse a snowflake ID from a path segment or body field.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}
