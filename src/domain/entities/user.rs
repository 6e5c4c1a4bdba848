//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Account role matching the `users.role` VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(40) NOT NULL
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - photo: TEXT NULL
/// - role: VARCHAR(16) NOT NULL DEFAULT 'user'
/// - premium_until: TIMESTAMPTZ NULL
/// - active: BOOLEAN NOT NULL DEFAULT TRUE
/// - password_changed_at: TIMESTAMPTZ NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Display name (1-40 characters)
    pub name: String,

    /// Email address (unique, lowercase)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Stored avatar file name
    pub photo: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    /// End of the paid premium period
    pub premium_until: Option<DateTime<Utc>>,

    /// False once the account has been deleted by its owner
    #[serde(skip_serializing)]
    pub active: bool,

    #[serde(skip_serializing)]
    pub password_changed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the premium period covers `now`.
    pub fn is_premium_at(&self, now: DateTime<Utc>) -> bool {
        self.premium_until.is_some_and(|until| until > now)
    }

    pub fn is_premium(&self) -> bool {
        self.is_premium_at(Utc::now())
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    /// Whether the password changed after a token issued at `issued_at` (Unix seconds).
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        self.password_changed_at
            .is_some_and(|changed| changed.timestamp() > issued_at)
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            photo: None,
            role: UserRole::default(),
            premium_until: None,
            active: true,
            password_changed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for User data access operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID, including inactive accounts.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// List active users, newest first.
    async fn list_active(&self) -> Result<Vec<User>, AppError>;

    /// Create a new user.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Persist every mutable column of an existing user.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Mark a user inactive.
    async fn deactivate(&self, id: i64) -> Result<(), AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}
