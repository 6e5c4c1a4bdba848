//! Chat message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maximum message length in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// A message posted to a chatroom.
///
/// Maps to the `messages` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - chatroom_id: BIGINT NOT NULL REFERENCES chatrooms(id) ON DELETE CASCADE
/// - author_id: BIGINT NOT NULL REFERENCES users(id)
/// - content: TEXT NOT NULL
/// - edited_at: TIMESTAMPTZ NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chatroom_id: i64,
    pub author_id: i64,
    pub content: String,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

/// Repository trait for message data access.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatMessage>, AppError>;

    /// Newest-first page of a room's messages, optionally strictly older than `before`.
    async fn find_by_chatroom(
        &self,
        chatroom_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, AppError>;

    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage, AppError>;

    async fn update(&self, message: &ChatMessage) -> Result<ChatMessage, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
