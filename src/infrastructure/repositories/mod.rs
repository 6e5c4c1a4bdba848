//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.
//!
//! ```rust,ignore
//! use material_chat::infrastructure::repositories::{
//!     PgChatroomRepository, PgMessageRepository, PgUserRepository,
//! };
//!
//! let users = PgUserRepository::new(pool.clone());
//! let chatrooms = PgChatroomRepository::new(pool.clone());
//! let messages = PgMessageRepository::new(pool);
//! ```

pub mod chatroom_repository;
pub mod message_repository;
pub mod user_repository;

pub use chatroom_repository::PgChatroomRepository;
pub use message_repository::PgMessageRepository;
pub use user_repository::PgUserRepository;
