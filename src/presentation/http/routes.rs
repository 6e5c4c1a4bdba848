//! Route Configuration
//!
//! Configures all HTTP routes and the middleware stack around them.

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
};

use super::handlers;
use crate::presentation::middleware::{
    auth_middleware, create_cors_layer, create_security_headers_layer, create_trace_layer,
    hpp_guard, optional_auth_middleware, rate_limit_api, sanitize_body, stamp_request_time,
    track_metrics,
};
use crate::startup::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    let mut router = Router::new()
        .merge(api_routes(state.clone()))
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .route("/metrics", get(handlers::health::metrics_handler));

    if settings.is_production() {
        if let Some(dir) = settings.http.static_dir.as_deref() {
            tracing::info!(dir, "Serving client build");
            let index = Path::new(dir).join("index.html");
            router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
        }
    }

    // Last layer added runs first.
    router
        .layer(middleware::from_fn(track_metrics))
        .layer(create_cors_layer(&settings.cors))
        .layer(create_trace_layer())
        .layer(create_security_headers_layer(&settings))
        .with_state(state)
}

/// Everything under `/api/v1`, behind the rate limiter and body filters
fn api_routes(state: AppState) -> Router<AppState> {
    let v1 = Router::new()
        .nest("/users", user_routes(state.clone()))
        .nest("/chatrooms", chatroom_routes(state.clone()))
        .nest("/messages", message_routes(state.clone()))
        .nest("/premium", premium_routes(state.clone()));

    Router::new()
        .nest("/api/v1", v1)
        .layer(middleware::from_fn(stamp_request_time))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn_with_state(state.clone(), hpp_guard))
        .layer(middleware::from_fn_with_state(state.clone(), sanitize_body))
        .layer(DefaultBodyLimit::max(state.settings.http.json_body_limit))
        .layer(middleware::from_fn_with_state(state, rate_limit_api))
}

/// Authentication, sign-up wizard and profile routes
fn user_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/logout", get(handlers::auth::logout))
        .route("/signup/steps", get(handlers::signup::steps))
        .route("/signup/step", post(handlers::signup::transition));

    let wizard = Router::new()
        .route("/signup/complete", post(handlers::signup::complete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let photo = Router::new()
        .route("/photo", patch(handlers::user::upload_photo))
        .layer(DefaultBodyLimit::max(state.settings.uploads.max_bytes));

    let protected = Router::new()
        .route("/", get(handlers::user::list_users))
        .route("/me", get(handlers::user::get_me))
        .route("/updateMe", patch(handlers::user::update_me))
        .route("/updateMyPassword", patch(handlers::auth::update_my_password))
        .route("/deleteMe", delete(handlers::user::delete_me))
        .route("/{id}", get(handlers::user::get_user))
        .merge(photo)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(wizard).merge(protected)
}

/// Chatroom routes (protected)
fn chatroom_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::chatroom::list_chatrooms).post(handlers::chatroom::create_chatroom),
        )
        .route(
            "/{id}",
            get(handlers::chatroom::get_chatroom)
                .patch(handlers::chatroom::update_chatroom)
                .delete(handlers::chatroom::delete_chatroom),
        )
        .route("/{id}/join", post(handlers::chatroom::join_chatroom))
        .route("/{id}/leave", post(handlers::chatroom::leave_chatroom))
        .route("/{id}/members", get(handlers::chatroom::list_members))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Message routes (protected)
fn message_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::message::list_messages).post(handlers::message::post_message),
        )
        .route(
            "/{id}",
            get(handlers::message::get_message)
                .patch(handlers::message::edit_message)
                .delete(handlers::message::delete_message),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Premium routes; the plan list is public
fn premium_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/status", get(handlers::premium::status))
        .route(
            "/subscribe",
            post(handlers::premium::subscribe).delete(handlers::premium::cancel),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/plans", get(handlers::premium::plans))
        .merge(protected)
}
