//! Authentication Handlers

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use serde_json::{json, Value};

use crate::application::dto::request::{LoginRequest, SignupRequest, UpdatePasswordRequest};
use crate::application::dto::response::AuthResponse;
use crate::application::services::{AuthService, AuthSession, SignupInput};
use crate::config::Settings;
use crate::presentation::middleware::{AuthUser, JWT_COOKIE};
use crate::shared::error::AppError;
use crate::shared::validation::validate_body;
use crate::startup::AppState;

/// Seconds a logout cookie survives in the browser
const LOGGED_OUT_COOKIE_SECONDS: i64 = 10;

fn jwt_cookie(value: &str, max_age_seconds: i64, secure: bool) -> Result<Cookie<'static>, AppError> {
    let mut raw = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        JWT_COOKIE, value, max_age_seconds
    );
    if secure {
        raw.push_str("; Secure");
    }

    Cookie::parse(raw).map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
}

/// Attach the session cookie for `session` to the jar.
fn with_session(
    jar: CookieJar,
    session: &AuthSession,
    settings: &Settings,
) -> Result<CookieJar, AppError> {
    let cookie = jwt_cookie(
        &session.token,
        settings.jwt.expires_in_days * 24 * 60 * 60,
        settings.is_production(),
    )?;
    Ok(jar.add(cookie))
}

/// Create an account and sign it in
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    validate_body(&body)?;

    let session = state
        .auth_service()
        .signup(SignupInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = with_session(jar, &session, &state.settings)?;

    Ok((StatusCode::CREATED, jar, Json(session.into())))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    validate_body(&body)?;

    let session = state
        .auth_service()
        .login(&body.email, &body.password)
        .await?;

    let jar = with_session(jar, &session, &state.settings)?;
    Ok((jar, Json(session.into())))
}

/// Overwrite the session cookie so the browser drops it
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let cookie = jwt_cookie(
        "loggedout",
        LOGGED_OUT_COOKIE_SECONDS,
        state.settings.is_production(),
    )?;

    Ok((jar.add(cookie), Json(json!({ "status": "success" }))))
}

/// Change the current user's password and re-issue the token
pub async fn update_my_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    validate_body(&body)?;

    let session = state
        .auth_service()
        .update_password(auth.user_id, &body.password_current, &body.password)
        .await?;

    tracing::info!(user_id = auth.user_id, "Password changed");

    let jar = with_session(jar, &session, &state.settings)?;
    Ok((jar, Json(session.into())))
}
