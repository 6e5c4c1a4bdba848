//! User Service
//!
//! Profile reads and updates, soft deletion and avatar bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get an active user by ID
    async fn get_user(&self, user_id: i64) -> Result<User, UserError>;

    /// List all active users
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Update name and/or email
    async fn update_me(&self, user_id: i64, update: UpdateProfileDto) -> Result<User, UserError>;

    /// Record a newly stored avatar file name
    async fn set_photo(&self, user_id: i64, file_name: String) -> Result<User, UserError>;

    /// Soft-delete the account
    async fn deactivate(&self, user_id: i64) -> Result<(), UserError>;
}

/// Profile fields a user may change themselves
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("No user found with that ID")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::EmailTaken => AppError::Conflict(err.to_string()),
            UserError::Store(inner) => inner,
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U: UserRepository + ?Sized> {
    users: Arc<U>,
}

impl<U: UserRepository + ?Sized> UserServiceImpl<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    async fn active_user(&self, user_id: i64) -> Result<User, UserError> {
        self.users
            .find_by_id(user_id)
            .await?
            .filter(|user| user.active)
            .ok_or(UserError::NotFound)
    }
}

#[async_trait]
impl<U: UserRepository + ?Sized> UserService for UserServiceImpl<U> {
    async fn get_user(&self, user_id: i64) -> Result<User, UserError> {
        self.active_user(user_id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.list_active().await?)
    }

    async fn update_me(&self, user_id: i64, update: UpdateProfileDto) -> Result<User, UserError> {
        let mut user = self.active_user(user_id).await?;

        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }

        if let Some(email) = update.email {
            let email = email.trim().to_lowercase();
            if email != user.email && self.users.email_exists(&email).await? {
                return Err(UserError::EmailTaken);
            }
            user.email = email;
        }

        Ok(self.users.update(&user).await?)
    }

    async fn set_photo(&self, user_id: i64, file_name: String) -> Result<User, UserError> {
        let mut user = self.active_user(user_id).await?;
        user.photo = Some(file_name);
        Ok(self.users.update(&user).await?)
    }

    async fn deactivate(&self, user_id: i64) -> Result<(), UserError> {
        self.active_user(user_id).await?;
        self.users.deactivate(user_id).await?;
        tracing::info!(user_id, "User deactivated");
        Ok(())
    }
}
