//! Chatroom entity, membership and repository trait.
//!
//! Maps to the `chatrooms` and `chatroom_members` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Chatroom names are 2 to 50 characters once trimmed.
pub const MIN_CHATROOM_NAME_LENGTH: usize = 2;
pub const MAX_CHATROOM_NAME_LENGTH: usize = 50;

/// A named room users join to exchange messages.
///
/// Maps to the `chatrooms` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(50) NOT NULL UNIQUE
/// - description: VARCHAR(500) NULL
/// - owner_id: BIGINT NOT NULL REFERENCES users(id)
/// - private: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chatroom {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    /// Private rooms are hidden from non-members and cannot be joined
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chatroom {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

/// A user's membership in a chatroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub chatroom_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
}

/// Repository trait for chatrooms and their memberships.
#[async_trait]
pub trait ChatroomRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Chatroom>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Chatroom>, AppError>;

    /// Public rooms plus the private rooms `user_id` belongs to, oldest first.
    async fn list_visible(&self, user_id: i64) -> Result<Vec<Chatroom>, AppError>;

    async fn count_owned_by(&self, owner_id: i64) -> Result<i64, AppError>;

    /// Insert the room and its owner's membership atomically.
    async fn create_with_owner(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError>;

    async fn update(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError>;

    /// Delete a room together with its memberships and messages.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Add a member; adding an existing member is a no-op returning the original row.
    async fn add_member(&self, chatroom_id: i64, user_id: i64) -> Result<Membership, AppError>;

    async fn remove_member(&self, chatroom_id: i64, user_id: i64) -> Result<(), AppError>;

    async fn is_member(&self, chatroom_id: i64, user_id: i64) -> Result<bool, AppError>;

    async fn list_members(&self, chatroom_id: i64) -> Result<Vec<Membership>, AppError>;
}
