//! Sign-up Wizard Handlers
//!
//! Server-side driver for the registration wizard, so clients can render the
//! dialog from the same step catalogue and transition rules.

use axum::{extract::Extension, Json};

use crate::application::dto::request::{WizardEventRequest, WizardStateRequest};
use crate::application::dto::response::{
    SignupCompletionResponse, SignupStepResponse, WizardStateResponse,
};
use crate::domain::registration::{catalogue, NotificationLevel, StepError};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;

fn step_error(err: StepError) -> AppError {
    // Skipping a mandatory step is already logged by the stepper.
    if !matches!(err, StepError::NotOptional { .. }) {
        tracing::warn!(error = %err, "Rejected registration wizard transition");
    }
    AppError::BadRequest(err.to_string())
}

/// Ordered wizard steps with their content
pub async fn steps() -> Json<Vec<SignupStepResponse>> {
    Json(catalogue().into_iter().map(Into::into).collect())
}

/// Apply a step event to a saved wizard position
pub async fn transition(
    Json(body): Json<WizardEventRequest>,
) -> Result<Json<WizardStateResponse>, AppError> {
    let stepper = body
        .state
        .to_stepper()
        .and_then(|stepper| stepper.apply(body.event))
        .map_err(step_error)?;

    Ok(Json(WizardStateResponse::new(&stepper, body.state.user_photo)))
}

/// Confirm the final step: redirect with a session, notify without one
pub async fn complete(
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<WizardStateRequest>,
) -> Result<Json<SignupCompletionResponse>, AppError> {
    let stepper = body.to_stepper().map_err(step_error)?;

    let mut navigate = |path: &str| tracing::info!(path, "Registration complete, redirecting");
    let mut notify = |level: NotificationLevel, message: &str| {
        tracing::info!(?level, text = message, "Registration notification");
    };

    let completion = stepper
        .complete_and_redirect(auth.is_some(), &mut navigate, &mut notify)
        .map_err(step_error)?;

    Ok(Json(SignupCompletionResponse {
        completion,
        steps: stepper.step_views(),
    }))
}
