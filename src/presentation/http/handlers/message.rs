//! Message Handlers

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::parse_id;
use crate::application::dto::request::{EditMessageRequest, MessageListQuery, PostMessageRequest};
use crate::application::dto::response::{ListResponse, MessageResponse};
use crate::application::services::MessageService;
use crate::presentation::middleware::{AuthUser, RequestTime};
use crate::shared::error::AppError;
use crate::shared::validation::validate_body;
use crate::startup::AppState;

/// Message history of a room, newest first
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Extension(RequestTime(requested_at)): Extension<RequestTime>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<ListResponse<MessageResponse>>, AppError> {
    let chatroom_id = parse_id(&query.chatroom, "chatroom")?;

    let messages = state
        .message_service()
        .history(auth.user_id, chatroom_id, query.to_dto())
        .await?;

    let data = messages.into_iter().map(MessageResponse::from).collect();
    Ok(Json(ListResponse::new(data, requested_at)))
}

pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    validate_body(&body)?;
    let chatroom_id = parse_id(&body.chatroom, "chatroom")?;

    let message = state
        .message_service()
        .post(auth.user_id, chatroom_id, &body.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

pub async fn get_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(message_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let message_id = parse_id(&message_id, "message")?;
    let message = state
        .message_service()
        .get(auth.user_id, message_id)
        .await?;
    Ok(Json(message.into()))
}

pub async fn edit_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(message_id): Path<String>,
    Json(body): Json<EditMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message_id = parse_id(&message_id, "message")?;
    validate_body(&body)?;

    let message = state
        .message_service()
        .edit(auth.user_id, message_id, &body.content)
        .await?;
    Ok(Json(message.into()))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(message_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let message_id = parse_id(&message_id, "message")?;
    state
        .message_service()
        .delete(auth.user_id, message_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
