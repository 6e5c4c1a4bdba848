//! Repository mocks shared by the service unit tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::{
    ChatMessage, Chatroom, ChatroomRepository, Membership, MessageRepository, User,
    UserRepository,
};
use crate::shared::error::AppError;

mock! {
    pub Users {}

    #[async_trait]
    impl UserRepository for Users {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn list_active(&self) -> Result<Vec<User>, AppError>;
        async fn create(&self, user: &User) -> Result<User, AppError>;
        async fn update(&self, user: &User) -> Result<User, AppError>;
        async fn deactivate(&self, id: i64) -> Result<(), AppError>;
        async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
        async fn ping(&self) -> Result<(), AppError>;
    }
}

mock! {
    pub Chatrooms {}

    #[async_trait]
    impl ChatroomRepository for Chatrooms {
        async fn find_by_id(&self, id: i64) -> Result<Option<Chatroom>, AppError>;
        async fn find_by_name(&self, name: &str) -> Result<Option<Chatroom>, AppError>;
        async fn list_visible(&self, user_id: i64) -> Result<Vec<Chatroom>, AppError>;
        async fn count_owned_by(&self, owner_id: i64) -> Result<i64, AppError>;
        async fn create_with_owner(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError>;
        async fn update(&self, chatroom: &Chatroom) -> Result<Chatroom, AppError>;
        async fn delete(&self, id: i64) -> Result<(), AppError>;
        async fn add_member(&self, chatroom_id: i64, user_id: i64) -> Result<Membership, AppError>;
        async fn remove_member(&self, chatroom_id: i64, user_id: i64) -> Result<(), AppError>;
        async fn is_member(&self, chatroom_id: i64, user_id: i64) -> Result<bool, AppError>;
        async fn list_members(&self, chatroom_id: i64) -> Result<Vec<Membership>, AppError>;
    }
}

mock! {
    pub Messages {}

    #[async_trait]
    impl MessageRepository for Messages {
        async fn find_by_id(&self, id: i64) -> Result<Option<ChatMessage>, AppError>;
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
}
