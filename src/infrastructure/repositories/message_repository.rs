//! Message Repository Implementation
//!
//! PostgreSQL implementation of message storage with cursor-based pagination.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{ChatMessage, MessageRepository};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    chatroom_id: i64,
    author_id: i64,
    content: String,
    edited_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            chatroom_id: self.chatroom_id,
            author_id: self.author_id,
            content: self.content,
            edited_at: self.edited_at,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatMessage>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chatroom_id, author_id, content, edited_at, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MessageRow::into_message))
    }

    async fn find_by_chatroom(
        &self,
        chatroom_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, AppError> {
        // Snowflake IDs are time-ordered, so the ID doubles as the cursor.
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chatroom_id, author_id, content, edited_at, created_at
            FROM messages
            WHERE chatroom_id = $1
              AND ($2::BIGINT IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(chatroom_id)
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }

    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, chatroom_id, author_id, content, edited_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, chatroom_id, author_id, content, edited_at, created_at
            "#,
        )
        .bind(message.id)
        .bind(message.chatroom_id)
        .bind(message.author_id)
        .bind(&message.content)
        .bind(message.edited_at)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    async fn update(&self, message: &ChatMessage) -> Result<ChatMessage, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            UPDATE messages
            SET content = $2, edited_at = $3
            WHERE id = $1
            RETURNING id, chatroom_id, author_id, content, edited_at, created_at
            "#,
        )
        .bind(message.id)
        .bind(&message.content)
        .bind(message.edited_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".into()))?;

        Ok(row.into_message())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
