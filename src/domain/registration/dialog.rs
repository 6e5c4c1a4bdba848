//! Sign-up dialog driver.
//!
//! Couples a [`Stepper`] with the side effects the dialog needs on completion:
//! a [`Navigator`] for the post-login redirect and a [`Notifier`] for
//! user-visible failures. Both are injected so the flow runs without any
//! ambient client state.

use serde::Serialize;

use super::stepper::{StepError, StepEvent, Stepper};
use super::steps::{render_step, RegistrationStep, StepContent};

/// Path the dialog redirects to after a successful sign-up.
pub const HOME_PATH: &str = "/";

/// Notification emitted when the confirmation step is reached without a session.
pub const REGISTRATION_FAILED_MESSAGE: &str =
    "Error during registry. Please refresh the page and try again.";

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Client-side navigation.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// User-facing notification sink.
pub trait Notifier {
    fn notify(&mut self, level: NotificationLevel, message: &str);
}

impl<F> Navigator for F
where
    F: FnMut(&str),
{
    fn navigate(&mut self, path: &str) {
        self(path)
    }
}

impl<F> Notifier for F
where
    F: FnMut(NotificationLevel, &str),
{
    fn notify(&mut self, level: NotificationLevel, message: &str) {
        self(level, message)
    }
}

/// How the confirmation step was exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Completion {
    Redirected { path: &'static str },
    Notified {
        level: NotificationLevel,
        message: &'static str,
    },
}

impl Completion {
    /// Decide the completion outcome from the session flag alone.
    pub fn resolve(is_authenticated: bool) -> Self {
        if is_authenticated {
            Self::Redirected { path: HOME_PATH }
        } else {
            Self::Notified {
                level: NotificationLevel::Error,
                message: REGISTRATION_FAILED_MESSAGE,
            }
        }
    }
}

impl Stepper {
    /// Finish the wizard from the confirmation step.
    ///
    /// With a session the user is sent to [`HOME_PATH`]; without one an error
    /// notification is raised and no navigation happens. The wizard state is
    /// left untouched either way, so the user restarts by reloading.
    pub fn complete_and_redirect<N, M>(
        &self,
        is_authenticated: bool,
        navigator: &mut N,
        notifier: &mut M,
    ) -> Result<Completion, StepError>
    where
        N: Navigator + ?Sized,
        M: Notifier + ?Sized,
    {
        if !self.current().is_some_and(RegistrationStep::is_terminal) {
            return Err(StepError::NotTerminal {
                step: self.active_step(),
            });
        }

        let completion = Completion::resolve(is_authenticated);
        match &completion {
            Completion::Redirected { path } => navigator.navigate(path),
            Completion::Notified { level, message } => {
                tracing::warn!("Registration finished without an authenticated session");
                notifier.notify(*level, message);
            }
        }

        Ok(completion)
    }
}

/// Modal sign-up dialog: wizard state plus injected effects.
///
/// State lives only as long as the dialog; dropping it discards the wizard.
pub struct RegistrationDialog<N, M> {
    stepper: Stepper,
    navigator: N,
    notifier: M,
}

impl<N, M> RegistrationDialog<N, M>
where
    N: Navigator,
    M: Notifier,
{
    pub fn new(navigator: N, notifier: M) -> Self {
        Self {
            stepper: Stepper::new(),
            navigator,
            notifier,
        }
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    /// Content for the step currently shown.
    pub fn content(&self) -> StepContent {
        render_step(self.stepper.active_step())
    }

    /// Apply a step's completion event. A rejected event leaves the dialog unchanged.
    pub fn handle(&mut self, event: StepEvent) -> Result<usize, StepError> {
        self.stepper = self.stepper.apply(event)?;
        Ok(self.stepper.active_step())
    }

    /// Press the optional step's Next/Skip button.
    pub fn press_optional_action(&mut self, user_photo: bool) -> Result<usize, StepError> {
        self.stepper = self.stepper.press_optional_action(user_photo)?;
        Ok(self.stepper.active_step())
    }

    /// Press the confirmation step's login button.
    pub fn confirm(&mut self, is_authenticated: bool) -> Result<Completion, StepError> {
        self.stepper
            .complete_and_redirect(is_authenticated, &mut self.navigator, &mut self.notifier)
    }

    /// Tear the dialog down, handing back the injected effects.
    pub fn into_parts(self) -> (N, M) {
        (self.navigator, self.notifier)
    }
}
