use uuid::Uuid;

use super::types::{InterventionResult, UrgeType};
use crate::history::types::HistoryEntry;
use crate::services::llm::schema::InterventionInput;

/// Identifies one suggestion request. Replies carrying any other id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that can happen to a wizard: user actions, timer ticks and
/// gateway replies.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    AcknowledgeUrge,
    SelectUrgeType(UrgeType),
    SetIntensity(i64),
    Advance,
    SetMotivation(i64),
    SetAbility(i64),
    Back,
    RequestSuggestion { context: Option<String> },
    SuggestionReady { request_id: RequestId, result: InterventionResult },
    SuggestionFailed { request_id: RequestId, error: String },
    Resolved,
    StartDelay,
    Tick,
    UrgeFaded,
    ActedOnUrge,
}

impl WizardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::AcknowledgeUrge => "acknowledge_urge",
            WizardEvent::SelectUrgeType(_) => "select_urge_type",
            WizardEvent::SetIntensity(_) => "set_intensity",
            WizardEvent::Advance => "advance",
            WizardEvent::SetMotivation(_) => "set_motivation",
            WizardEvent::SetAbility(_) => "set_ability",
            WizardEvent::Back => "back",
            WizardEvent::RequestSuggestion { .. } => "request_suggestion",
            WizardEvent::SuggestionReady { .. } => "suggestion_ready",
            WizardEvent::SuggestionFailed { .. } => "suggestion_failed",
            WizardEvent::Resolved => "resolved",
            WizardEvent::StartDelay => "start_delay",
            WizardEvent::Tick => "tick",
            WizardEvent::UrgeFaded => "urge_faded",
            WizardEvent::ActedOnUrge => "acted_on_urge",
        }
    }
}

/// Work the kernel asks its driver to do. The kernel itself never does I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    RequestIntervention { request_id: RequestId, input: InterventionInput },
    StartCountdown { seconds: u32 },
    StopCountdown,
    RecordHistory(HistoryEntry),
    /// Transient message for the user (error toast).
    Notify(String),
}
