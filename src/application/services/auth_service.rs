//! Authentication Service
//!
//! Signup, login, password changes and JWT issue/verification.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::domain::{User, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign the new user in
    async fn signup(&self, input: SignupInput) -> Result<AuthSession, AuthError>;

    /// Authenticate with email and password
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Change the password after checking the current one; re-issues the token
    async fn update_password(
        &self,
        user_id: i64,
        current: &str,
        new_password: &str,
    ) -> Result<AuthSession, AuthError>;

    /// Resolve a bearer token to the active user it belongs to
    async fn authenticate(&self, token: &str) -> Result<User, AuthError>;
}

/// Signup input after request validation
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A signed-in user with a freshly issued token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailExists,

    #[error("Your current password is wrong.")]
    WrongPassword,

    #[error("Invalid token. Please log in again!")]
    InvalidToken,

    #[error("Your token has expired! Please log in again.")]
    TokenExpired,

    #[error("The user belonging to this token no longer exists.")]
    UserGone,

    #[error("User recently changed password! Please log in again.")]
    PasswordChanged,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailExists => AppError::Conflict(err.to_string()),
            AuthError::Internal(msg) => AppError::Internal(msg),
            AuthError::Store(inner) => inner,
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// AuthService implementation
pub struct AuthServiceImpl<U: UserRepository + ?Sized> {
    users: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
    jwt_settings: JwtSettings,
}

impl<U: UserRepository + ?Sized> AuthServiceImpl<U> {
    pub fn new(
        users: Arc<U>,
        id_generator: Arc<SnowflakeGenerator>,
        jwt_settings: JwtSettings,
    ) -> Self {
        Self {
            users,
            id_generator,
            jwt_settings,
        }
    }

    /// Sign a token for `user_id`
    pub fn issue_token(&self, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::days(self.jwt_settings.expires_in_days)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Decode and validate a token's signature and expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self.issue_token(user.id)?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl<U: UserRepository + ?Sized> AuthService for AuthServiceImpl<U> {
    async fn signup(&self, input: SignupInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim().to_lowercase();

        if self.users.email_exists(&email).await? {
            return Err(AuthError::EmailExists);
        }

        let now = Utc::now();
        let user = User {
            id: self.id_generator.generate(),
            name: input.name.trim().to_string(),
            email,
            password_hash: hash_password(&input.password)?,
            created_at: now,
            updated_at: now,
            ..Default::default()
        };

        let created = self.users.create(&user).await?;
        metrics::record_signup();
        tracing::info!(user_id = created.id, "User signed up");

        self.session_for(created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .filter(|user| user.active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Rejected login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.session_for(user)
    }

    async fn update_password(
        &self,
        user_id: i64,
        current: &str,
        new_password: &str,
    ) -> Result<AuthSession, AuthError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserGone)?;

        if !verify_password(current, &user.password_hash)? {
            return Err(AuthError::WrongPassword);
        }

        user.password_hash = hash_password(new_password)?;
        // Backdated so the token issued below is not older than the change.
        user.password_changed_at = Some(Utc::now() - Duration::seconds(1));

        let updated = self.users.update(&user).await?;
        tracing::info!(user_id, "Password updated");

        self.session_for(updated)
    }

    async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.verify_token(token)?;
        let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|user| user.active)
            .ok_or(AuthError::UserGone)?;

        if user.changed_password_after(claims.iat) {
            return Err(AuthError::PasswordChanged);
        }

        Ok(user)
    }
}
