//! Chatroom Service
//!
//! Room lifecycle, membership and the premium gates on room creation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::config::PremiumSettings;
use crate::domain::{
    Chatroom, ChatroomRepository, Membership, User, MAX_CHATROOM_NAME_LENGTH,
    MIN_CHATROOM_NAME_LENGTH,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Chatroom service trait
#[async_trait]
pub trait ChatroomService: Send + Sync {
    /// Public rooms plus private rooms the user belongs to
    async fn list_visible(&self, user_id: i64) -> Result<Vec<Chatroom>, ChatroomError>;

    /// Create a room owned by `owner`, who becomes its first member
    async fn create(&self, owner: &User, input: CreateChatroomDto)
        -> Result<Chatroom, ChatroomError>;

    /// Fetch a room the user may see
    async fn get(&self, user_id: i64, chatroom_id: i64) -> Result<Chatroom, ChatroomError>;

    /// Owner-only update
    async fn update(
        &self,
        actor: &User,
        chatroom_id: i64,
        input: UpdateChatroomDto,
    ) -> Result<Chatroom, ChatroomError>;

    /// Owner-only delete
    async fn delete(&self, user_id: i64, chatroom_id: i64) -> Result<(), ChatroomError>;

    /// Join a public room
    async fn join(&self, user_id: i64, chatroom_id: i64) -> Result<Membership, ChatroomError>;

    /// Leave a room the user does not own
    async fn leave(&self, user_id: i64, chatroom_id: i64) -> Result<(), ChatroomError>;

    /// Members of a room the user may see
    async fn members(&self, user_id: i64, chatroom_id: i64)
        -> Result<Vec<Membership>, ChatroomError>;
}

/// Create chatroom input
#[derive(Debug, Clone)]
pub struct CreateChatroomDto {
    pub name: String,
    pub description: Option<String>,
    pub private: bool,
}

/// Update chatroom input; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateChatroomDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub private: Option<bool>,
}

/// Chatroom service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatroomError {
    #[error("No chatroom found with that ID")]
    NotFound,

    #[error("A chatroom with this name already exists")]
    NameTaken,

    #[error("Chatroom name must be {min}-{max} characters")]
    InvalidName { min: usize, max: usize },

    #[error("Only the owner can modify this chatroom")]
    NotOwner,

    #[error("You are not a member of this chatroom")]
    NotMember,

    #[error("Private chatrooms can only be joined by invitation of the owner")]
    PrivateRoom,

    #[error("The owner cannot leave their own chatroom")]
    OwnerCannotLeave,

    #[error("Private chatrooms are a premium feature")]
    PremiumRequired,

    #[error("Free accounts can own at most {limit} chatrooms. Upgrade to premium for more")]
    RoomLimitReached { limit: i64 },

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<ChatroomError> for AppError {
    fn from(err: ChatroomError) -> Self {
        match err {
            ChatroomError::NotFound => AppError::NotFound(err.to_string()),
            ChatroomError::NameTaken => AppError::Conflict(err.to_string()),
            ChatroomError::InvalidName { .. } => AppError::BadRequest(err.to_string()),
            ChatroomError::NotOwner
            | ChatroomError::NotMember
            | ChatroomError::PrivateRoom
            | ChatroomError::OwnerCannotLeave => AppError::Forbidden(err.to_string()),
            ChatroomError::PremiumRequired | ChatroomError::RoomLimitReached { .. } => {
                AppError::PaymentRequired(err.to_string())
            }
            ChatroomError::Store(inner) => inner,
        }
    }
}

/// Trim `name` and check its length.
fn checked_name(name: &str) -> Result<String, ChatroomError> {
    let name = name.trim();
    let length = name.chars().count();
    if !(MIN_CHATROOM_NAME_LENGTH..=MAX_CHATROOM_NAME_LENGTH).contains(&length) {
        return Err(ChatroomError::InvalidName {
            min: MIN_CHATROOM_NAME_LENGTH,
            max: MAX_CHATROOM_NAME_LENGTH,
        });
    }
    Ok(name.to_string())
}

/// ChatroomService implementation
pub struct ChatroomServiceImpl<C: ChatroomRepository + ?Sized> {
    chatrooms: Arc<C>,
    id_generator: Arc<SnowflakeGenerator>,
    premium: PremiumSettings,
}

impl<C: ChatroomRepository + ?Sized> ChatroomServiceImpl<C> {
    pub fn new(
        chatrooms: Arc<C>,
        id_generator: Arc<SnowflakeGenerator>,
        premium: PremiumSettings,
    ) -> Self {
        Self {
            chatrooms,
            id_generator,
            premium,
        }
    }

    async fn find(&self, chatroom_id: i64) -> Result<Chatroom, ChatroomError> {
        self.chatrooms
            .find_by_id(chatroom_id)
            .await?
            .ok_or(ChatroomError::NotFound)
    }

    /// Private rooms are visible to members only
    async fn visible(&self, user_id: i64, chatroom_id: i64) -> Result<Chatroom, ChatroomError> {
        let room = self.find(chatroom_id).await?;
        if room.private && !self.chatrooms.is_member(room.id, user_id).await? {
            return Err(ChatroomError::NotMember);
        }
        Ok(room)
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i64>) -> Result<(), ChatroomError> {
        match self.chatrooms.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(ChatroomError::NameTaken),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<C: ChatroomRepository + ?Sized> ChatroomService for ChatroomServiceImpl<C> {
    async fn list_visible(&self, user_id: i64) -> Result<Vec<Chatroom>, ChatroomError> {
        Ok(self.chatrooms.list_visible(user_id).await?)
    }

    async fn create(
        &self,
        owner: &User,
        input: CreateChatroomDto,
    ) -> Result<Chatroom, ChatroomError> {
        let name = checked_name(&input.name)?;
        let premium = owner.is_premium();

        if input.private && !premium {
            return Err(ChatroomError::PremiumRequired);
        }

        if !premium {
            let owned = self.chatrooms.count_owned_by(owner.id).await?;
            if owned >= self.premium.free_chatroom_limit {
                return Err(ChatroomError::RoomLimitReached {
                    limit: self.premium.free_chatroom_limit,
                });
            }
        }

        self.ensure_name_free(&name, None).await?;

        let now = Utc::now();
        let room = Chatroom {
            id: self.id_generator.generate(),
            name,
            description: input.description,
            owner_id: owner.id,
            private: input.private,
            created_at: now,
            updated_at: now,
        };

        let created = self.chatrooms.create_with_owner(&room).await?;
        tracing::info!(chatroom_id = created.id, owner_id = owner.id, "Chatroom created");

        Ok(created)
    }

    async fn get(&self, user_id: i64, chatroom_id: i64) -> Result<Chatroom, ChatroomError> {
        self.visible(user_id, chatroom_id).await
    }

    async fn update(
        &self,
        actor: &User,
        chatroom_id: i64,
        input: UpdateChatroomDto,
    ) -> Result<Chatroom, ChatroomError> {
        let mut room = self.find(chatroom_id).await?;
        if !room.is_owned_by(actor.id) {
            return Err(ChatroomError::NotOwner);
        }

        if let Some(name) = input.name {
            let name = checked_name(&name)?;
            self.ensure_name_free(&name, Some(room.id)).await?;
            room.name = name;
        }
        if let Some(description) = input.description {
            room.description = Some(description);
        }
        if let Some(private) = input.private {
            if private && !room.private && !actor.is_premium() {
                return Err(ChatroomError::PremiumRequired);
            }
            room.private = private;
        }

        Ok(self.chatrooms.update(&room).await?)
    }

    async fn delete(&self, user_id: i64, chatroom_id: i64) -> Result<(), ChatroomError> {
        let room = self.find(chatroom_id).await?;
        if !room.is_owned_by(user_id) {
            return Err(ChatroomError::NotOwner);
        }

        self.chatrooms.delete(room.id).await?;
        tracing::info!(chatroom_id, user_id, "Chatroom deleted");
        Ok(())
    }

    async fn join(&self, user_id: i64, chatroom_id: i64) -> Result<Membership, ChatroomError> {
        let room = self.find(chatroom_id).await?;
        if room.private && !room.is_owned_by(user_id) {
            return Err(ChatroomError::PrivateRoom);
        }

        Ok(self.chatrooms.add_member(room.id, user_id).await?)
    }

    async fn leave(&self, user_id: i64, chatroom_id: i64) -> Result<(), ChatroomError> {
        let room = self.find(chatroom_id).await?;
        if room.is_owned_by(user_id) {
            return Err(ChatroomError::OwnerCannotLeave);
        }
        if !self.chatrooms.is_member(room.id, user_id).await? {
            return Err(ChatroomError::NotMember);
        }

        Ok(self.chatrooms.remove_member(room.id, user_id).await?)
    }

    async fn members(
        &self,
        user_id: i64,
        chatroom_id: i64,
    ) -> Result<Vec<Membership>, ChatroomError> {
        let room = self.visible(user_id, chatroom_id).await?;
        Ok(self.chatrooms.list_members(room.id).await?)
    }
}
