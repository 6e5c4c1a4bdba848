//! Message Service
//!
//! Posting, paging, editing and deleting chatroom messages.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{ChatMessage, Chatroom, ChatroomRepository, MessageRepository, MAX_MESSAGE_LENGTH};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Default page size for message history
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Newest-first page of a room's history
    async fn history(
        &self,
        user_id: i64,
        chatroom_id: i64,
        query: MessageQueryDto,
    ) -> Result<Vec<ChatMessage>, MessageError>;

    /// Post to a room the user belongs to
    async fn post(
        &self,
        author_id: i64,
        chatroom_id: i64,
        content: &str,
    ) -> Result<ChatMessage, MessageError>;

    /// Fetch one message from a room the user belongs to
    async fn get(&self, user_id: i64, message_id: i64) -> Result<ChatMessage, MessageError>;

    /// Author-only edit
    async fn edit(
        &self,
        author_id: i64,
        message_id: i64,
        content: &str,
    ) -> Result<ChatMessage, MessageError>;

    /// Delete by the author or the room owner
    async fn delete(&self, actor_id: i64, message_id: i64) -> Result<(), MessageError>;
}

/// Message query parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageQueryDto {
    pub before: Option<i64>,
    pub limit: Option<i64>,
}

impl MessageQueryDto {
    /// Requested page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn page_size(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("No message found with that ID")]
    NotFound,

    #[error("No chatroom found with that ID")]
    ChatroomNotFound,

    #[error("You are not a member of this chatroom")]
    NotMember,

    #[error("You can only change your own messages")]
    Forbidden,

    #[error("Message content cannot be empty")]
    EmptyContent,

    #[error("Message content must be at most {max} characters")]
    ContentTooLong { max: usize },

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<MessageError> for AppError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::NotFound | MessageError::ChatroomNotFound => {
                AppError::NotFound(err.to_string())
            }
            MessageError::NotMember | MessageError::Forbidden => {
                AppError::Forbidden(err.to_string())
            }
            MessageError::EmptyContent | MessageError::ContentTooLong { .. } => {
                AppError::validation(err.to_string())
            }
            MessageError::Store(inner) => inner,
        }
    }
}

/// Trimmed content, or the reason it is unacceptable
fn checked_content(content: &str) -> Result<String, MessageError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(MessageError::EmptyContent);
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(MessageError::ContentTooLong {
            max: MAX_MESSAGE_LENGTH,
        });
    }
    Ok(content.to_string())
}

/// MessageService implementation
pub struct MessageServiceImpl<M, C>
where
    M: MessageRepository + ?Sized,
    C: ChatroomRepository + ?Sized,
{
    messages: Arc<M>,
    chatrooms: Arc<C>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<M, C> MessageServiceImpl<M, C>
where
    M: MessageRepository + ?Sized,
    C: ChatroomRepository + ?Sized,
{
    pub fn new(messages: Arc<M>, chatrooms: Arc<C>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            messages,
            chatrooms,
            id_generator,
        }
    }

    async fn member_room(&self, user_id: i64, chatroom_id: i64) -> Result<Chatroom, MessageError> {
        let room = self
            .chatrooms
            .find_by_id(chatroom_id)
            .await?
            .ok_or(MessageError::ChatroomNotFound)?;

        if !self.chatrooms.is_member(room.id, user_id).await? {
            return Err(MessageError::NotMember);
        }

        Ok(room)
    }

    async fn find(&self, message_id: i64) -> Result<ChatMessage, MessageError> {
        self.messages
            .find_by_id(message_id)
            .await?
            .ok_or(MessageError::NotFound)
    }
}

#[async_trait]
impl<M, C> MessageService for MessageServiceImpl<M, C>
where
    M: MessageRepository + ?Sized,
    C: ChatroomRepository + ?Sized,
{
    async fn history(
        &self,
        user_id: i64,
        chatroom_id: i64,
        query: MessageQueryDto,
    ) -> Result<Vec<ChatMessage>, MessageError> {
        let room = self.member_room(user_id, chatroom_id).await?;

        Ok(self
            .messages
            .find_by_chatroom(room.id, query.before, query.page_size())
            .await?)
    }

    async fn post(
        &self,
        author_id: i64,
        chatroom_id: i64,
        content: &str,
    ) -> Result<ChatMessage, MessageError> {
        let content = checked_content(content)?;
        let room = self.member_room(author_id, chatroom_id).await?;

        let message = ChatMessage {
            id: self.id_generator.generate(),
            chatroom_id: room.id,
            author_id,
            content,
            edited_at: None,
            created_at: Utc::now(),
        };

        let created = self.messages.create(&message).await?;
        metrics::record_message("posted");
        tracing::debug!(message_id = created.id, chatroom_id, author_id, "Message posted");

        Ok(created)
    }

    async fn get(&self, user_id: i64, message_id: i64) -> Result<ChatMessage, MessageError> {
        let message = self.find(message_id).await?;
        self.member_room(user_id, message.chatroom_id).await?;
        Ok(message)
    }

    async fn edit(
        &self,
        author_id: i64,
        message_id: i64,
        content: &str,
    ) -> Result<ChatMessage, MessageError> {
        let content = checked_content(content)?;
        let mut message = self.find(message_id).await?;

        if message.author_id != author_id {
            return Err(MessageError::Forbidden);
        }

        message.content = content;
        message.edited_at = Some(Utc::now());

        let updated = self.messages.update(&message).await?;
        metrics::record_message("edited");

        Ok(updated)
    }

    async fn delete(&self, actor_id: i64, message_id: i64) -> Result<(), MessageError> {
        let message = self.find(message_id).await?;

        if message.author_id != actor_id {
            let room = self
                .chatrooms
                .find_by_id(message.chatroom_id)
                .await?
                .ok_or(MessageError::ChatroomNotFound)?;
            if !room.is_owned_by(actor_id) {
                return Err(MessageError::Forbidden);
            }
        }

        self.messages.delete(message.id).await?;
        metrics::record_message("deleted");

        Ok(())
    }
}
