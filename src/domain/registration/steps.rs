//! Sign-up wizard step catalogue and per-step content.

use serde::Serialize;

/// Number of steps in the sign-up wizard.
pub const STEP_COUNT: usize = 3;

/// A named step of the sign-up wizard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    /// Name, email and password form
    AccountInfo,
    /// Avatar upload; the only step that may be skipped
    AvatarPhoto,
    /// Final confirmation with the login action
    Confirm,
}

impl RegistrationStep {
    /// All steps in the order the wizard walks them.
    pub const ALL: [RegistrationStep; STEP_COUNT] = [
        RegistrationStep::AccountInfo,
        RegistrationStep::AvatarPhoto,
        RegistrationStep::Confirm,
    ];

    /// Look up the step at `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this step in the wizard.
    pub fn index(self) -> usize {
        match self {
            Self::AccountInfo => 0,
            Self::AvatarPhoto => 1,
            Self::Confirm => 2,
        }
    }

    /// Label shown next to the step indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::AccountInfo => "Enter your account information",
            Self::AvatarPhoto => "Choose an avatar photo (optional)",
            Self::Confirm => "Complete Signup and Login",
        }
    }

    pub fn is_optional(self) -> bool {
        matches!(self, Self::AvatarPhoto)
    }

    pub fn is_terminal(self) -> bool {
        self.index() == STEP_COUNT - 1
    }
}

/// Serializable description of a step, as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub index: usize,
    pub key: RegistrationStep,
    pub label: &'static str,
    pub optional: bool,
}

impl From<RegistrationStep> for StepDescriptor {
    fn from(step: RegistrationStep) -> Self {
        Self {
            index: step.index(),
            key: step,
            label: step.label(),
            optional: step.is_optional(),
        }
    }
}

/// The full ordered step catalogue.
pub fn catalogue() -> Vec<StepDescriptor> {
    RegistrationStep::ALL
        .iter()
        .copied()
        .map(StepDescriptor::from)
        .collect()
}

/// Message shown on the confirmation step.
pub const CONFIRMATION_MESSAGE: &str = "All steps completed - all set to login!";

/// Label of the confirmation step's action button.
pub const LOGIN_ACTION_LABEL: &str = "Login";

/// Content displayed inside a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepContent {
    /// Account information form; submitting it completes step 0
    AccountForm,
    /// Avatar upload widget
    PhotoUpload,
    /// Terminal confirmation with a login button
    Confirmation {
        message: &'static str,
        action_label: &'static str,
    },
    /// Fallback for an index outside the catalogue
    Unknown,
}

impl std::fmt::Display for StepContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountForm => write!(f, "account form"),
            Self::PhotoUpload => write!(f, "photo upload"),
            Self::Confirmation { message, .. } => write!(f, "{}", message),
            Self::Unknown => write!(f, "Unknown step"),
        }
    }
}

/// Map a step index to the content it renders.
///
/// Indices outside the catalogue cannot be produced by the stepper; they are
/// answered with [`StepContent::Unknown`] and logged.
pub fn render_step(index: usize) -> StepContent {
    match RegistrationStep::from_index(index) {
        Some(RegistrationStep::AccountInfo) => StepContent::AccountForm,
        Some(RegistrationStep::AvatarPhoto) => StepContent::PhotoUpload,
        Some(RegistrationStep::Confirm) => StepContent::Confirmation {
            message: CONFIRMATION_MESSAGE,
            action_label: LOGIN_ACTION_LABEL,
        },
        None => {
            tracing::warn!(index, "Rendering unknown registration step");
            StepContent::Unknown
        }
    }
}
