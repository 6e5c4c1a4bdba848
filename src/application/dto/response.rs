//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake IDs are rendered as
//! strings so JavaScript clients do not lose precision.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::{AuthSession, PlanOffer, PremiumStatus};
use crate::domain::registration::{
    render_step, Completion, OptionalStepAction, StepContent, StepDescriptor, StepView, Stepper,
};
use crate::domain::{ChatMessage, Chatroom, Membership, User, UserRole};

/// Public user representation
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub role: UserRole,
    pub premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            premium: user.is_premium(),
            name: user.name,
            email: user.email,
            photo: user.photo,
            role: user.role,
            premium_until: user.premium_until,
            created_at: user.created_at,
        }
    }
}

/// Token plus the signed-in user
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: session.user.into(),
        }
    }
}

/// List envelope
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub results: usize,
    pub requested_at: DateTime<Utc>,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, requested_at: DateTime<Utc>) -> Self {
        Self {
            results: data.len(),
            requested_at,
            data,
        }
    }
}

/// One wizard step with the content it renders
#[derive(Debug, Serialize)]
pub struct SignupStepResponse {
    #[serde(flatten)]
    pub step: StepDescriptor,
    pub content: StepContent,
}

impl From<StepDescriptor> for SignupStepResponse {
    fn from(step: StepDescriptor) -> Self {
        let content = render_step(step.index);
        Self { step, content }
    }
}

/// Wizard position after a transition, with everything needed to draw it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStateResponse {
    pub active_step: usize,
    pub skipped_steps: Vec<usize>,
    pub finished: bool,
    pub can_skip: bool,
    pub optional_action: Option<OptionalStepAction>,
    /// `None` once the wizard has moved past the last step
    pub content: Option<StepContent>,
    pub steps: Vec<StepView>,
}

impl WizardStateResponse {
    pub fn new(stepper: &Stepper, user_photo: bool) -> Self {
        Self {
            active_step: stepper.active_step(),
            skipped_steps: stepper.skipped().iter().collect(),
            finished: stepper.is_finished(),
            can_skip: stepper.can_skip(),
            optional_action: stepper.optional_action(user_photo),
            content: stepper.current().map(|step| render_step(step.index())),
            steps: stepper.step_views(),
        }
    }
}

/// Outcome of the confirmation step
#[derive(Debug, Serialize)]
pub struct SignupCompletionResponse {
    #[serde(flatten)]
    pub completion: Completion,
    pub steps: Vec<StepView>,
}

/// Chatroom response
#[derive(Debug, Serialize)]
pub struct ChatroomResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chatroom> for ChatroomResponse {
    fn from(room: Chatroom) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name,
            description: room.description,
            owner_id: room.owner_id.to_string(),
            private: room.private,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Chatroom membership response
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub chatroom_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

impl From<Membership> for MemberResponse {
    fn from(membership: Membership) -> Self {
        Self {
            chatroom_id: membership.chatroom_id.to_string(),
            user_id: membership.user_id.to_string(),
            joined_at: membership.joined_at,
        }
    }
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub chatroom_id: String,
    pub author_id: String,
    pub content: String,
    pub edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            chatroom_id: message.chatroom_id.to_string(),
            author_id: message.author_id.to_string(),
            edited: message.is_edited(),
            content: message.content,
            edited_at: message.edited_at,
            created_at: message.created_at,
        }
    }
}

/// Premium plans response
#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanOffer>,
}

/// Premium status response
#[derive(Debug, Serialize)]
pub struct PremiumStatusResponse {
    #[serde(flatten)]
    pub status: PremiumStatus,
}

impl From<&User> for PremiumStatusResponse {
    fn from(user: &User) -> Self {
        Self {
            status: PremiumStatus::of(user, Utc::now()),
        }
    }
}
