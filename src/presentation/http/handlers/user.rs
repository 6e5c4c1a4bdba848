//! User Handlers

use std::path::PathBuf;

use axum::{
    extract::{multipart::MultipartError, Extension, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::parse_id;
use crate::application::dto::request::UpdateMeRequest;
use crate::application::dto::response::{ListResponse, UserResponse};
use crate::application::services::{UpdateProfileDto, UserService};
use crate::presentation::middleware::{AuthUser, RequestTime};
use crate::shared::error::AppError;
use crate::shared::validation::validate_body;
use crate::startup::AppState;

/// Multipart field carrying the avatar
pub const PHOTO_FIELD: &str = "photo";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// Current authenticated user
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service().get_user(auth.user_id).await?;
    Ok(Json(user.into()))
}

/// Update name and email. Passwords go through `updateMyPassword`.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if body.touches_password() {
        return Err(AppError::BadRequest(
            "This route is not for password updates. Please use /updateMyPassword.".into(),
        ));
    }
    validate_body(&body)?;

    let user = state
        .user_service()
        .update_me(
            auth.user_id,
            UpdateProfileDto {
                name: body.name,
                email: body.email,
            },
        )
        .await?;

    Ok(Json(user.into()))
}

/// Soft-delete the current user
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    state.user_service().deactivate(auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// File extension for an image content type, e.g. `image/png` -> `png`.
pub(crate) fn image_extension(content_type: &str) -> Option<&str> {
    content_type
        .strip_prefix("image/")
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Upload an avatar photo
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let ext = field
            .content_type()
            .and_then(image_extension)
            .ok_or_else(|| AppError::BadRequest("Not an image! Please upload only images.".into()))?
            .to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        let file_name = format!(
            "user-{}-{}.{}",
            auth.user_id,
            Utc::now().timestamp_millis(),
            ext
        );
        let dir = PathBuf::from(&state.settings.uploads.dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot create upload directory: {}", e)))?;
        tokio::fs::write(dir.join(&file_name), &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot store photo: {}", e)))?;

        tracing::debug!(user_id = auth.user_id, file = %file_name, size = bytes.len(), "Stored avatar");

        let user = state
            .user_service()
            .set_photo(auth.user_id, file_name)
            .await?;
        return Ok(Json(user.into()));
    }

    Err(AppError::BadRequest("Please upload a photo".into()))
}

/// Active users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(RequestTime(requested_at)): Extension<RequestTime>,
) -> Result<Json<ListResponse<UserResponse>>, AppError> {
    let users = state.user_service().list_users().await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(ListResponse::new(data, requested_at)))
}

/// User by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let user = state.user_service().get_user(user_id).await?;
    Ok(Json(user.into()))
}
