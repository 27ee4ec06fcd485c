use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::countdown::{Countdown, DELAY_SECONDS};
use super::event::{RequestId, SideEffect, WizardEvent};
use super::state::{Step, WizardState};
use super::types::{Level, LevelError, Outcome, SessionDraft};
use crate::history::types::HistoryEntry;
use crate::services::actions::INTERVENTION_FAILED;
use crate::services::llm::schema::InterventionInput;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("`{event}` is not valid in step {state}")]
    InvalidTransition { state: Step, event: &'static str },
    #[error("select an urge type before continuing")]
    UrgeTypeMissing,
    #[error(transparent)]
    OutOfRange(#[from] LevelError),
    #[error("a suggestion request is already in flight")]
    RequestInFlight,
}

type Transition = (WizardState, Result<Vec<SideEffect>, WizardError>);

/// One urge-logging session.
///
/// Pure: `handle` folds an event into the state and returns the side effects
/// the driver has to carry out. A rejected event leaves state and draft as
/// they were.
#[derive(Debug)]
pub struct UrgeWizard {
    state: WizardState,
    draft: SessionDraft,
    session_id: Uuid,
}

impl Default for UrgeWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl UrgeWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Initial,
            draft: SessionDraft::default(),
            session_id: Uuid::new_v4(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn handle(&mut self, event: WizardEvent) -> Result<Vec<SideEffect>, WizardError> {
        let from = self.state.step();
        let state = std::mem::take(&mut self.state);
        let (next, result) = self.transition(state, event);
        self.state = next;

        let to = self.state.step();
        if from != to {
            info!("Wizard {} -> {}", from, to);
        }
        result
    }

    /// Back to INITIAL with a fresh default draft. Safe to call from any step,
    /// any number of times.
    pub fn reset(&mut self) -> Vec<SideEffect> {
        let was_counting = matches!(self.state, WizardState::Delay { .. });
        self.reset_session();
        if was_counting {
            vec![SideEffect::StopCountdown]
        } else {
            Vec::new()
        }
    }

    fn reset_session(&mut self) {
        self.state = WizardState::Initial;
        self.draft = SessionDraft::default();
        self.session_id = Uuid::new_v4();
    }

    fn transition(&mut self, state: WizardState, event: WizardEvent) -> Transition {
        match (state, event) {
            // Gateway replies. Anything not matching the outstanding request is dropped.
            (state, WizardEvent::SuggestionReady { request_id, result }) => match state {
                WizardState::FoggModel { pending: Some(p), .. } if p == request_id => {
                    (WizardState::Intervention { result }, Ok(Vec::new()))
                }
                other => {
                    debug!("Discarded stale suggestion {:?} in {}", request_id, other.step());
                    (other, Ok(Vec::new()))
                }
            },
            (state, WizardEvent::SuggestionFailed { request_id, error }) => match state {
                WizardState::FoggModel { pending: Some(p), .. } if p == request_id => {
                    let message = if error.trim().is_empty() {
                        INTERVENTION_FAILED.to_string()
                    } else {
                        error
                    };
                    (
                        WizardState::FoggModel { pending: None, last_error: Some(message.clone()) },
                        Ok(vec![SideEffect::Notify(message)]),
                    )
                }
                other => {
                    debug!("Discarded stale failure {:?} in {}", request_id, other.step());
                    (other, Ok(Vec::new()))
                }
            },

            // Timer ticks only matter in DELAY; late ticks elsewhere are ignored.
            (state, WizardEvent::Tick) => match state {
                WizardState::Delay { result, mut countdown } => {
                    let effects = if countdown.tick() {
                        info!("Delay finished");
                        vec![SideEffect::StopCountdown]
                    } else {
                        Vec::new()
                    };
                    (WizardState::Delay { result, countdown }, Ok(effects))
                }
                other => (other, Ok(Vec::new())),
            },

            (WizardState::Initial, WizardEvent::AcknowledgeUrge) => (WizardState::Classify, Ok(Vec::new())),

            // CLASSIFY
            (WizardState::Classify, WizardEvent::SelectUrgeType(urge_type)) => {
                self.draft.urge_type = Some(urge_type);
                (WizardState::Classify, Ok(Vec::new()))
            }
            (WizardState::Classify, WizardEvent::SetIntensity(value)) => match Level::new(value) {
                Ok(level) => {
                    self.draft.intensity = level;
                    (WizardState::Classify, Ok(Vec::new()))
                }
                Err(e) => (WizardState::Classify, Err(e.into())),
            },
            (WizardState::Classify, WizardEvent::Advance) => {
                if self.draft.urge_type.is_some() {
                    (WizardState::FoggModel { pending: None, last_error: None }, Ok(Vec::new()))
                } else {
                    (WizardState::Classify, Err(WizardError::UrgeTypeMissing))
                }
            }

            // FOGG_MODEL, request outstanding: inputs are frozen.
            (
                WizardState::FoggModel { pending: Some(p), last_error },
                WizardEvent::SetMotivation(_)
                | WizardEvent::SetAbility(_)
                | WizardEvent::Back
                | WizardEvent::RequestSuggestion { .. },
            ) => (
                WizardState::FoggModel { pending: Some(p), last_error },
                Err(WizardError::RequestInFlight),
            ),

            // FOGG_MODEL, idle
            (WizardState::FoggModel { pending: None, last_error }, WizardEvent::SetMotivation(value)) => {
                let result = Level::new(value).map(|level| {
                    self.draft.motivation = level;
                    Vec::new()
                });
                (WizardState::FoggModel { pending: None, last_error }, result.map_err(Into::into))
            }
            (WizardState::FoggModel { pending: None, last_error }, WizardEvent::SetAbility(value)) => {
                let result = Level::new(value).map(|level| {
                    self.draft.ability = level;
                    Vec::new()
                });
                (WizardState::FoggModel { pending: None, last_error }, result.map_err(Into::into))
            }
            (WizardState::FoggModel { pending: None, .. }, WizardEvent::Back) => {
                (WizardState::Classify, Ok(Vec::new()))
            }
            (WizardState::FoggModel { pending: None, last_error }, WizardEvent::RequestSuggestion { context }) => {
                let Some(urge_type) = self.draft.urge_type else {
                    return (
                        WizardState::FoggModel { pending: None, last_error },
                        Err(WizardError::UrgeTypeMissing),
                    );
                };
                let request_id = RequestId::new();
                let input = InterventionInput {
                    urge_type,
                    motivation_level: self.draft.motivation.get(),
                    ability_level: self.draft.ability.get(),
                    context,
                };
                info!(
                    "Requesting intervention {:?} (motivation {}, ability {})",
                    request_id.0, input.motivation_level, input.ability_level
                );
                (
                    WizardState::FoggModel { pending: Some(request_id), last_error: None },
                    Ok(vec![SideEffect::RequestIntervention { request_id, input }]),
                )
            }

            // INTERVENTION
            (state @ WizardState::Intervention { .. }, WizardEvent::Resolved) => {
                self.finish(state, Outcome::Resisted, false)
            }
            (WizardState::Intervention { result }, WizardEvent::StartDelay) => (
                WizardState::Delay { result, countdown: Countdown::new(DELAY_SECONDS) },
                Ok(vec![SideEffect::StartCountdown { seconds: DELAY_SECONDS }]),
            ),

            // DELAY: the user may leave at any count, expired or not.
            (state @ WizardState::Delay { .. }, WizardEvent::UrgeFaded) => {
                self.finish(state, Outcome::Resisted, true)
            }
            (state @ WizardState::Delay { .. }, WizardEvent::ActedOnUrge) => {
                self.finish(state, Outcome::Acted, true)
            }

            (state, event) => {
                let err = WizardError::InvalidTransition { state: state.step(), event: event.name() };
                (state, Err(err))
            }
        }
    }

    /// Records the session and resets. Terminal transitions all go through here.
    fn finish(&mut self, state: WizardState, outcome: Outcome, stop_timer: bool) -> Transition {
        let Some(urge_type) = self.draft.urge_type else {
            return (state, Err(WizardError::UrgeTypeMissing));
        };

        let entry = HistoryEntry::new(self.session_id, urge_type, self.draft.intensity, outcome);
        info!("Session {} finished: {:?}", self.session_id, outcome);

        let mut effects = Vec::with_capacity(2);
        if stop_timer {
            effects.push(SideEffect::StopCountdown);
        }
        effects.push(SideEffect::RecordHistory(entry));

        self.reset_session();
        (WizardState::Initial, Ok(effects))
    }
}
