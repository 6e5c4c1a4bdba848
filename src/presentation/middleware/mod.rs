//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod hpp;
pub mod logging;
pub mod rate_limit;
pub mod request_time;
pub mod sanitize;
pub mod security;

pub use auth::{auth_middleware, optional_auth_middleware, AuthUser, JWT_COOKIE};
pub use cors::create_cors_layer;
pub use hpp::hpp_guard;
pub use logging::{create_trace_layer, track_metrics};
pub use rate_limit::{rate_limit_api, RateLimitInfo, RateLimiter};
pub use request_time::{stamp_request_time, RequestTime};
pub use sanitize::sanitize_body;
pub use security::{create_security_headers_layer, SecurityHeadersConfig, SecurityHeadersLayer};
