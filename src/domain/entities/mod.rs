//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the chat service.
//! All entities map directly to their corresponding database tables.
//!
//! - **User**: account with authentication data, avatar and premium period
//! - **Chatroom**: a named room with an owner and members
//! - **ChatMessage**: a text message posted to a chatroom
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod chatroom;
mod message;
mod user;

pub use chatroom::{
    Chatroom, ChatroomRepository, Membership, MAX_CHATROOM_NAME_LENGTH, MIN_CHATROOM_NAME_LENGTH,
};
pub use message::{ChatMessage, MessageRepository, MAX_MESSAGE_LENGTH};
pub use user::{User, UserRepository, UserRole};
