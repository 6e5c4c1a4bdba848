//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Signup, login, password changes, JWT tokens
//! - **UserService**: Profile management and soft deletion
//! - **ChatroomService**: Rooms, membership and premium gating
//! - **MessageService**: Message history and CRUD
//! - **PremiumService**: Subscription plans

pub mod auth_service;
pub mod chatroom_service;
pub mod message_service;
pub mod premium_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod mocks;

pub use auth_service::{
    hash_password, verify_password, AuthError, AuthService, AuthServiceImpl, AuthSession, Claims,
    SignupInput,
};
pub use chatroom_service::{
    ChatroomError, ChatroomService, ChatroomServiceImpl, CreateChatroomDto, UpdateChatroomDto,
};
pub use message_service::{
    MessageError, MessageQueryDto, MessageService, MessageServiceImpl, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use premium_service::{
    Plan, PlanOffer, PremiumError, PremiumService, PremiumServiceImpl, PremiumStatus,
};
pub use user_service::{UpdateProfileDto, UserError, UserService, UserServiceImpl};
