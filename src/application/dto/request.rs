//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

use crate::application::services::{MessageQueryDto, Plan};
use crate::domain::registration::{SkippedSteps, StepError, StepEvent, Stepper};

/// Signup request, submitted by the account-info step of the wizard
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 40, message = "Please tell us your name!"))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords are not the same!"))]
    pub password_confirm: String,
}

/// Saved wizard position sent back by the client
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStateRequest {
    #[serde(default)]
    pub active_step: usize,

    #[serde(default)]
    pub skipped_steps: Vec<usize>,

    /// Whether the user already uploaded an avatar
    #[serde(default)]
    pub user_photo: bool,
}

impl WizardStateRequest {
    pub fn to_stepper(&self) -> Result<Stepper, StepError> {
        let skipped = SkippedSteps::try_from_indices(self.skipped_steps.iter().copied())?;
        Stepper::resume(self.active_step, skipped)
    }
}

/// Wizard position plus the event the current step reported
#[derive(Debug, Deserialize)]
pub struct WizardEventRequest {
    #[serde(flatten)]
    pub state: WizardStateRequest,

    pub event: StepEvent,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Please provide email and password!"))]
    pub password: String,
}

/// Profile update; password fields are accepted only to be rejected
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 40, message = "Name must be 1-40 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,

    pub password: Option<String>,

    pub password_confirm: Option<String>,
}

impl UpdateMeRequest {
    pub fn touches_password(&self) -> bool {
        self.password.is_some() || self.password_confirm.is_some()
    }
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Please provide your current password"))]
    pub password_current: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords are not the same!"))]
    pub password_confirm: String,
}

/// Create chatroom request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatroomRequest {
    #[validate(length(min = 2, max = 50, message = "Chatroom name must be 2-50 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub private: bool,
}

/// Update chatroom request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChatroomRequest {
    #[validate(length(min = 2, max = 50, message = "Chatroom name must be 2-50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub private: Option<bool>,
}

/// Post message request
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    pub chatroom: String,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

/// Edit message request
#[derive(Debug, Deserialize, Validate)]
pub struct EditMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

/// Message history query string
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    pub chatroom: String,
    pub before: Option<String>,
    pub limit: Option<i64>,
}

impl MessageListQuery {
    /// Unparseable cursors are ignored
    pub fn to_dto(&self) -> MessageQueryDto {
        MessageQueryDto {
            before: self.before.as_deref().and_then(|s| s.parse().ok()),
            limit: self.limit,
        }
    }
}

/// Subscribe request
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan: Plan,
}
