//! Step sequencing for the sign-up wizard.
//!
//! [`Stepper`] is an immutable value: every transition consumes the current
//! state and returns the next one, so the caller decides when to commit it.

use serde::{Deserialize, Serialize};

use super::steps::{RegistrationStep, STEP_COUNT};

/// Errors raised by wizard transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("You can't skip a step that isn't optional.")]
    NotOptional { step: usize },

    #[error("Step {step} is outside the registration wizard")]
    OutOfRange { step: usize },

    #[error("Event {event:?} does not belong to step {step}")]
    UnexpectedEvent { step: usize, event: StepEvent },

    #[error("Step {step} cannot be recorded as skipped")]
    InvalidSkipRecord { step: usize },

    #[error("Registration can only be completed from the final step (currently at {step})")]
    NotTerminal { step: usize },
}

/// Outcome reported by a step's content when the user finishes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    /// The account form was submitted successfully
    AccountSubmitted,
    /// An avatar photo was uploaded
    PhotoChosen,
    /// The user bypassed the current step
    Skipped,
}

/// Set of skipped step indices, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkippedSteps(u8);

impl SkippedSteps {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, index: usize) -> bool {
        index < STEP_COUNT && self.0 & (1 << index) != 0
    }

    /// Copy of this set with `index` added. Indices past the catalogue are ignored.
    #[must_use]
    pub fn with(self, index: usize) -> Self {
        if index < STEP_COUNT {
            Self(self.0 | (1 << index))
        } else {
            self
        }
    }

    /// Copy of this set with `index` removed.
    #[must_use]
    pub fn without(self, index: usize) -> Self {
        if index < STEP_COUNT {
            Self(self.0 & !(1 << index))
        } else {
            self
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..STEP_COUNT).filter(move |i| self.contains(*i))
    }
}

impl SkippedSteps {
    /// Build a set from client-supplied indices, rejecting any outside the catalogue.
    pub fn try_from_indices<I>(indices: I) -> Result<Self, StepError>
    where
        I: IntoIterator<Item = usize>,
    {
        indices.into_iter().try_fold(Self::empty(), |set, index| {
            if index < STEP_COUNT {
                Ok(set.with(index))
            } else {
                Err(StepError::InvalidSkipRecord { step: index })
            }
        })
    }
}

impl FromIterator<usize> for SkippedSteps {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), SkippedSteps::with)
    }
}

/// Action offered by the single button on the optional step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalStepAction {
    Next,
    Skip,
}

impl OptionalStepAction {
    /// Pick the action from whether the user already has a photo.
    pub fn for_photo(user_photo: bool) -> Self {
        if user_photo {
            Self::Next
        } else {
            Self::Skip
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Skip => "Skip",
        }
    }
}

/// How a single step should be drawn in the step indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub index: usize,
    pub label: &'static str,
    pub active: bool,
    pub completed: bool,
    pub optional: bool,
}

/// Wizard position plus the record of skipped steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stepper {
    active_step: usize,
    skipped: SkippedSteps,
}

impl Stepper {
    /// Fresh wizard positioned on the first step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a wizard from a saved position, e.g. when a skipped step is revisited.
    ///
    /// Every skipped index must be an optional step at or before `active_step`.
    pub fn resume(active_step: usize, skipped: SkippedSteps) -> Result<Self, StepError> {
        if active_step > STEP_COUNT {
            return Err(StepError::OutOfRange { step: active_step });
        }

        if let Some(step) = skipped
            .iter()
            .find(|&i| i > active_step || !Self::is_step_optional(i))
        {
            return Err(StepError::InvalidSkipRecord { step });
        }

        Ok(Self {
            active_step,
            skipped,
        })
    }

    pub fn active_step(&self) -> usize {
        self.active_step
    }

    /// The step currently shown, or `None` once the wizard is finished.
    pub fn current(&self) -> Option<RegistrationStep> {
        RegistrationStep::from_index(self.active_step)
    }

    pub fn skipped(&self) -> SkippedSteps {
        self.skipped
    }

    pub fn is_step_optional(index: usize) -> bool {
        RegistrationStep::from_index(index).is_some_and(RegistrationStep::is_optional)
    }

    pub fn is_step_skipped(&self, index: usize) -> bool {
        self.skipped.contains(index)
    }

    pub fn is_finished(&self) -> bool {
        self.active_step >= STEP_COUNT
    }

    /// Whether the skip control should be enabled.
    pub fn can_skip(&self) -> bool {
        Self::is_step_optional(self.active_step)
    }

    /// Move to the next step, clearing a skip record for the step being left.
    pub fn advance(self) -> Result<Self, StepError> {
        if self.is_finished() {
            return Err(StepError::OutOfRange {
                step: self.active_step,
            });
        }

        Ok(Self {
            active_step: self.active_step + 1,
            skipped: self.skipped.without(self.active_step),
        })
    }

    /// Bypass the current step. Only the optional step may be skipped.
    pub fn skip(self) -> Result<Self, StepError> {
        if !self.can_skip() {
            tracing::warn!(step = self.active_step, "Attempted to skip a mandatory registration step");
            return Err(StepError::NotOptional {
                step: self.active_step,
            });
        }

        Ok(Self {
            active_step: self.active_step + 1,
            skipped: self.skipped.with(self.active_step),
        })
    }

    /// Apply the event a step reported on completion.
    pub fn apply(self, event: StepEvent) -> Result<Self, StepError> {
        match (self.current(), event) {
            (Some(RegistrationStep::AccountInfo), StepEvent::AccountSubmitted)
            | (Some(RegistrationStep::AvatarPhoto), StepEvent::PhotoChosen) => self.advance(),
            (_, StepEvent::Skipped) => self.skip(),
            _ => Err(StepError::UnexpectedEvent {
                step: self.active_step,
                event,
            }),
        }
    }

    /// The button offered on the optional step, if the wizard is on it.
    pub fn optional_action(&self, user_photo: bool) -> Option<OptionalStepAction> {
        self.can_skip()
            .then(|| OptionalStepAction::for_photo(user_photo))
    }

    /// Press the optional step's button: "Next" when a photo exists, otherwise "Skip".
    pub fn press_optional_action(self, user_photo: bool) -> Result<Self, StepError> {
        match OptionalStepAction::for_photo(user_photo) {
            OptionalStepAction::Next if self.can_skip() => self.advance(),
            OptionalStepAction::Next => Err(StepError::UnexpectedEvent {
                step: self.active_step,
                event: StepEvent::PhotoChosen,
            }),
            OptionalStepAction::Skip => self.skip(),
        }
    }

    /// Indicator state for every step. Skipped steps are never shown as completed.
    pub fn step_views(&self) -> Vec<StepView> {
        RegistrationStep::ALL
            .iter()
            .map(|step| {
                let index = step.index();
                StepView {
                    index,
                    label: step.label(),
                    active: index == self.active_step,
                    completed: index < self.active_step && !self.is_step_skipped(index),
                    optional: step.is_optional(),
                }
            })
            .collect()
    }
}
