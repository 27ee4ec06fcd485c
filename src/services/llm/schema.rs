//! Request/response shapes for the three generation operations, and the
//! checks applied on both sides of the backend call.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::kernel::types::UrgeType;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid backend output: {0}")]
    InvalidOutput(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Shape check shared by inputs and outputs.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be blank"))
    } else {
        Ok(())
    }
}

fn require_rating(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (1.0..=10.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be within 1-10, got {value}"))
    }
}

// --- Intervention ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionInput {
    pub urge_type: UrgeType,
    pub motivation_level: u8,
    pub ability_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl InterventionInput {
    /// Blank context counts as no context.
    pub fn context_text(&self) -> Option<&str> {
        self.context.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

impl Validate for InterventionInput {
    fn validate(&self) -> Result<(), String> {
        require_rating("motivationLevel", f64::from(self.motivation_level))?;
        require_rating("abilityLevel", f64::from(self.ability_level))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionOutput {
    pub intervention: String,
    pub explanation: String,
}

impl Validate for InterventionOutput {
    fn validate(&self) -> Result<(), String> {
        require_text("intervention", &self.intervention)?;
        require_text("explanation", &self.explanation)
    }
}

// --- Implementation intention ---

pub const MIN_TRIGGERS_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationIntentionInput {
    /// Comma-separated short phrases.
    pub logged_triggers: String,
    pub habit_category: String,
}

impl Validate for ImplementationIntentionInput {
    fn validate(&self) -> Result<(), String> {
        require_text("habitCategory", &self.habit_category)?;
        if self.logged_triggers.trim().chars().count() < MIN_TRIGGERS_LEN {
            return Err(format!(
                "loggedTriggers needs at least {MIN_TRIGGERS_LEN} characters"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationIntentionOutput {
    pub implementation_intention: String,
}

impl Validate for ImplementationIntentionOutput {
    fn validate(&self) -> Result<(), String> {
        require_text("implementationIntention", &self.implementation_intention)
    }
}

// --- Urge surfing ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgeSurfingInput {
    pub urge_type: String,
    pub intensity_before: f64,
}

impl Validate for UrgeSurfingInput {
    fn validate(&self) -> Result<(), String> {
        require_text("urgeType", &self.urge_type)?;
        require_rating("intensityBefore", self.intensity_before)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgeSurfingOutput {
    pub script: String,
    pub intensity_after: f64,
}

impl Validate for UrgeSurfingOutput {
    fn validate(&self) -> Result<(), String> {
        require_text("script", &self.script)?;
        require_rating("intensityAfter", self.intensity_after)
    }
}

// --- JSON schemas handed to the backend's constrained decoding ---

pub fn intervention_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "intervention": { "type": "string" },
            "explanation": { "type": "string" }
        },
        "required": ["intervention", "explanation"]
    })
}

pub fn implementation_intention_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "implementationIntention": { "type": "string" }
        },
        "required": ["implementationIntention"]
    })
}

pub fn urge_surfing_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "script": { "type": "string" },
            "intensityAfter": { "type": "number", "minimum": 1, "maximum": 10 }
        },
        "required": ["script", "intensityAfter"]
    })
}

/// Pulls the JSON object out of a completion, tolerating a Markdown fence.
pub fn parse_output<T>(content: &str) -> GatewayResult<T>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let mut body = content.trim();
    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.strip_suffix("```").unwrap_or(rest).trim();
    }

    let parsed: T = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidOutput(e.to_string()))?;
    parsed.validate().map_err(GatewayError::InvalidOutput)?;
    Ok(parsed)
}
