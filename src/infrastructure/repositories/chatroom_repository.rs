//! Chatroom Repository Implementation
//!
//! PostgreSQL implementation of chatroom and membership storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Chatroom, ChatroomRepository, Membership};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ChatroomRow {
    id: i64,
    name: String,
    description: Option<String>,
    owner_id: i64,
    private: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ChatroomRow> for Chatroom {
    fn from(row: ChatroomRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
            private: row.private,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    chatroom_id: i64,
    user_id: i64,
    joined_at: DateTime<Utc>,
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Self {
            chatroom_id: row.chatroom_id,
            user_id: row.user_id,
            joined_at: row.joined_at,
        }
    }
}

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("A chatroom with this name already exists".into())
        }
        _ => AppError::Database(e),
    }
}

/// PostgreSQL chatroom repository.
#[derive(Clone)]
pub struct PgChatroomRepository {
    pool: PgPool,
}

impl PgChatroomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatroomRepository for PgChatroomRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Chatroom>, AppError> {
        let row = sqlx::query_as::<_, ChatroomRow>(
            r#"
            SELECT id, name, description, owner_id, private, created_at, updated_at
            FROM chatrooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chatroom::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Chatroom>, AppError> {
        let row = sqlx::query_as::<_, ChatroomRow>(
            r#"
            SELECT id, name, description, owner_id, private, created_at, updated_at
            FROM chatrooms
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chatroom::from))
    }

    async fn list_visible(&self, user_id: i64) -> Result<Vec<Chatroom>, AppError> {
        let rows = sqlx::query_as::<_, ChatroomRow>(
            r#"
            SELECT c.id, c.name, c.description, c.owner_id, c.private, c.created_at, c.updated_at
            FROM chatrooms c
            WHERE c.private = FALSE
               OR EXISTS (
                   SELECT 1 FROM chatroom_members m
                   WHERE m.chatroom_id = c.id AND m.user_id = $1
               )
            ORDER BY c.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Chatroom::from).collect())
    }

    async fn count_owned_by(&self, owner_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chatrooms WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_with_owner(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ChatroomRow>(
            r#"
            INSERT INTO chatrooms (id, name, description, owner_id, private, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, owner_id, private, created_at, updated_at
            "#,
        )
        .bind(chatroom.id)
        .bind(&chatroom.name)
        .bind(&chatroom.description)
        .bind(chatroom.owner_id)
        .bind(chatroom.private)
        .bind(chatroom.created_at)
        .bind(chatroom.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO chatroom_members (chatroom_id, user_id, joined_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(row.id)
        .bind(row.owner_id)
        .bind(row.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn update(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError> {
        let row = sqlx::query_as::<_, ChatroomRow>(
            r#"
            UPDATE chatrooms
            SET name = $2, description = $3, private = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, private, created_at, updated_at
            "#,
        )
        .bind(chatroom.id)
        .bind(&chatroom.name)
        .bind(&chatroom.description)
        .bind(chatroom.private)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::NotFound("Chatroom not found".into()))?;

        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        // Memberships and messages go with the room via ON DELETE CASCADE.
        sqlx::query("DELETE FROM chatrooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_member(&self, chatroom_id: i64, user_id: i64) -> Result<Membership, AppError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            INSERT INTO chatroom_members (chatroom_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (chatroom_id, user_id) DO UPDATE SET chatroom_id = EXCLUDED.chatroom_id
            RETURNING chatroom_id, user_id, joined_at
            "#,
        )
        .bind(chatroom_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn remove_member(&self, chatroom_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM chatroom_members WHERE chatroom_id = $1 AND user_id = $2")
            .bind(chatroom_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_member(&self, chatroom_id: i64, user_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM chatroom_members WHERE chatroom_id = $1 AND user_id = $2)",
        )
        .bind(chatroom_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_members(&self, chatroom_id: i64) -> Result<Vec<Membership>, AppError> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT chatroom_id, user_id, joined_at
            FROM chatroom_members
            WHERE chatroom_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(chatroom_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Membership::from).collect())
    }
}
