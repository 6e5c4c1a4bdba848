//! Chatroom Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use super::parse_id;
use crate::application::dto::request::{CreateChatroomRequest, UpdateChatroomRequest};
use crate::application::dto::response::{ChatroomResponse, ListResponse, MemberResponse};
use crate::application::services::{ChatroomService, CreateChatroomDto, UpdateChatroomDto};
use crate::presentation::middleware::{AuthUser, RequestTime};
use crate::shared::error::AppError;
use crate::shared::validation::validate_body;
use crate::startup::AppState;

/// Rooms visible to the caller
pub async fn list_chatrooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Extension(RequestTime(requested_at)): Extension<RequestTime>,
) -> Result<Json<ListResponse<ChatroomResponse>>, AppError> {
    let rooms = state.chatroom_service().list_visible(auth.user_id).await?;
    let data = rooms.into_iter().map(ChatroomResponse::from).collect();
    Ok(Json(ListResponse::new(data, requested_at)))
}

/// Create a room owned by the caller
pub async fn create_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateChatroomRequest>,
) -> Result<(StatusCode, Json<ChatroomResponse>), AppError> {
    validate_body(&body)?;

    let room = state
        .chatroom_service()
        .create(
            &auth.user,
            CreateChatroomDto {
                name: body.name,
                description: body.description,
                private: body.private,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(room.into())))
}

pub async fn get_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(chatroom_id): Path<String>,
) -> Result<Json<ChatroomResponse>, AppError> {
    let chatroom_id = parse_id(&chatroom_id, "chatroom")?;
    let room = state
        .chatroom_service()
        .get(auth.user_id, chatroom_id)
        .await?;
    Ok(Json(room.into()))
}

pub async fn update_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(chatroom_id): Path<String>,
    Json(body): Json<UpdateChatroomRequest>,
) -> Result<Json<ChatroomResponse>, AppError> {
    let chatroom_id = parse_id(&chatroom_id, "chatroom")?;
    validate_body(&body)?;

    let room = state
        .chatroom_service()
        .update(
            &auth.user,
            chatroom_id,
            UpdateChatroomDto {
                name: body.name,
                description: body.description,
                private: body.private,
            },
        )
        .await?;
    Ok(Json(room.into()))
}

pub async fn delete_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(chatroom_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let chatroom_id = parse_id(&chatroom_id, "chatroom")?;
    state
        .chatroom_service()
        .delete(auth.user_id, chatroom_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(chatroom_id): Path<String>,
) -> Result<Json<MemberResponse>, AppError> {
    let chatroom_id = parse_id(&chatroom_id, "chatroom")?;
    let membership = state
        .chatroom_service()
        .join(auth.user_id, chatroom_id)
        .await?;
    Ok(Json(membership.into()))
}

pub async fn leave_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(chatroom_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let chatroom_id = parse_id(&chatroom_id, "chatroom")?;
    state
        .chatroom_service()
        .leave(auth.user_id, chatroom_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Extension(RequestTime(requested_at)): Extension<RequestTime>,
    Path(chatroom_id): Path<String>,
) -> Result<Json<ListResponse<MemberResponse>>, AppError> {
    let chatroom_id = parse_id(&chatroom_id, "chatroom")?;
    let members = state
        .chatroom_service()
        .members(auth.user_id, chatroom_id)
        .await?;
    let data = members.into_iter().map(MemberResponse::from).collect();
    Ok(Json(ListResponse::new(data, requested_at)))
}
