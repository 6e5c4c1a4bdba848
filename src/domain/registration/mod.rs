//! # Registration Wizard
//!
//! State machine behind the sign-up dialog. The wizard walks three steps in
//! order: account information, an optional avatar photo, and a final
//! confirmation that hands off to the post-login redirect.
//!
//! ```text
//! AccountInfo --submitted--> AvatarPhoto --photo chosen--> Confirm --login--> redirect "/"
//!                                 |                           ^         \
//!                                 +----------skipped----------+          +-> notify (no session)
//! ```
//!
//! There is no way back: the active step only ever moves forward within a
//! dialog session.

mod dialog;
mod stepper;
mod steps;

pub use dialog::{
    Completion, NotificationLevel, Navigator, Notifier, RegistrationDialog, HOME_PATH,
    REGISTRATION_FAILED_MESSAGE,
};
pub use stepper::{OptionalStepAction, SkippedSteps, StepError, StepEvent, StepView, Stepper};
pub use steps::{
    catalogue, render_step, RegistrationStep, StepContent, StepDescriptor, CONFIRMATION_MESSAGE,
    LOGIN_ACTION_LABEL, STEP_COUNT,
};
