//! # Domain Layer
//!
//! The domain layer contains the core business rules of the chat service.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Chatroom, ChatMessage) and repository traits
//! - **registration**: The sign-up wizard state machine
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod registration;

// Re-export commonly used types
pub use entities::*;
