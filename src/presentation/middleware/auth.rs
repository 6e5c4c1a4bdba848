//! Authentication Middleware
//!
//! Resolves the caller from a Bearer token or the `jwt` cookie.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};

use crate::application::services::AuthService;
use crate::domain::User;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Name of the session cookie
pub const JWT_COOKIE: &str = "jwt";

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub user: User,
}

impl AuthUser {
    fn new(user: User) -> Self {
        Self {
            user_id: user.id,
            user,
        }
    }
}

/// Token from `Authorization: Bearer ...`, falling back to the cookie.
pub fn extract_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().trim().to_string())
        .filter(|token| !token.is_empty());

    if bearer.is_some() {
        return bearer;
    }

    jar.get(JWT_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty() && token != "loggedout")
}

async fn resolve_user(state: &AppState, token: &str) -> Result<User, AppError> {
    Ok(state.auth_service().authenticate(token).await?)
}

/// Authentication middleware for protected routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers(), &jar).ok_or_else(|| {
        AppError::Unauthorized("You are not logged in! Please log in to get access.".into())
    })?;

    let user = resolve_user(&state, &token).await?;
    tracing::debug!(user_id = user.id, "Authenticated request");

    request.extensions_mut().insert(AuthUser::new(user));
    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no token)
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(request.headers(), &jar) {
        match resolve_user(&state, &token).await {
            Ok(user) => {
                request.extensions_mut().insert(AuthUser::new(user));
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring unusable credentials"),
        }
    }

    next.run(request).await
}
