use std::fmt;

use super::countdown::Countdown;
use super::event::RequestId;
use super::types::{InterventionResult, Route};

/// Where the wizard is. Each variant carries only what is valid there.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WizardState {
    #[default]
    Initial,
    Classify,
    FoggModel {
        /// Set while a suggestion request is outstanding.
        pending: Option<RequestId>,
        last_error: Option<String>,
    },
    Intervention {
        result: InterventionResult,
    },
    Delay {
        result: InterventionResult,
        countdown: Countdown,
    },
}

/// Data-free view of `WizardState`, for logging and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Initial,
    Classify,
    FoggModel,
    Intervention,
    Delay,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Initial => "INITIAL",
            Step::Classify => "CLASSIFY",
            Step::FoggModel => "FOGG_MODEL",
            Step::Intervention => "INTERVENTION",
            Step::Delay => "DELAY",
        };
        f.write_str(name)
    }
}

impl WizardState {
    pub fn step(&self) -> Step {
        match self {
            WizardState::Initial => Step::Initial,
            WizardState::Classify => Step::Classify,
            WizardState::FoggModel { .. } => Step::FoggModel,
            WizardState::Intervention { .. } => Step::Intervention,
            WizardState::Delay { .. } => Step::Delay,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WizardState::FoggModel { pending: Some(_), .. })
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        match self {
            WizardState::FoggModel { pending, .. } => *pending,
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            WizardState::FoggModel { last_error, .. } => last_error.as_deref(),
            _ => None,
        }
    }

    pub fn intervention(&self) -> Option<&InterventionResult> {
        match self {
            WizardState::Intervention { result } | WizardState::Delay { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Seconds left on the delay timer; 0 outside DELAY.
    pub fn time_left(&self) -> u32 {
        match self {
            WizardState::Delay { countdown, .. } => countdown.remaining(),
            _ => 0,
        }
    }

    /// Page the current step points the user at, if any.
    pub fn linked_route(&self) -> Option<Route> {
        match self {
            WizardState::Delay { .. } => Some(Route::Tools),
            _ => None,
        }
    }
}
