//! Uniform envelope around every generation call. Nothing above this layer
//! sees a `GatewayError`; failures become a fixed user-facing message.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::error;

use super::llm::schema::{
    ImplementationIntentionInput, ImplementationIntentionOutput, InterventionInput,
    InterventionOutput, UrgeSurfingInput, UrgeSurfingOutput,
};
use super::llm::TextGenerator;

pub const INTERVENTION_FAILED: &str = "Failed to get intervention.";
pub const IMPLEMENTATION_INTENTION_FAILED: &str = "Failed to get implementation intention.";
pub const URGE_SURFING_FAILED: &str = "Failed to get urge surfing script.";

/// Serializes as `{"success": true, "data": ..}` or `{"success": false, "error": ..}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ActionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ActionResult::Success(data) => Some(data),
            ActionResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionResult::Success(_) => None,
            ActionResult::Failure(msg) => Some(msg),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActionResult", 2)?;
        match self {
            ActionResult::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            ActionResult::Failure(msg) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", msg)?;
            }
        }
        state.end()
    }
}

pub async fn get_intervention(
    generator: &dyn TextGenerator,
    input: &InterventionInput,
) -> ActionResult<InterventionOutput> {
    match generator.suggest_intervention(input).await {
        Ok(result) => ActionResult::Success(result),
        Err(e) => {
            error!("Error getting intervention: {}", e);
            ActionResult::Failure(INTERVENTION_FAILED.to_string())
        }
    }
}

pub async fn get_implementation_intention(
    generator: &dyn TextGenerator,
    input: &ImplementationIntentionInput,
) -> ActionResult<ImplementationIntentionOutput> {
    match generator.implementation_intention(input).await {
        Ok(result) => ActionResult::Success(result),
        Err(e) => {
            error!("Error getting implementation intention: {}", e);
            ActionResult::Failure(IMPLEMENTATION_INTENTION_FAILED.to_string())
        }
    }
}

pub async fn get_urge_surfing_script(
    generator: &dyn TextGenerator,
    input: &UrgeSurfingInput,
) -> ActionResult<UrgeSurfingOutput> {
    match generator.urge_surfing_script(input).await {
        Ok(result) => ActionResult::Success(result),
        Err(e) => {
            error!("Error getting urge surfing script: {}", e);
            ActionResult::Failure(URGE_SURFING_FAILED.to_string())
        }
    }
}
