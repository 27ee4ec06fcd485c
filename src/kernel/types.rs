use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of urge categories a session can be classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgeType {
    Food,
    Shopping,
    SocialMedia,
    Sex,
    Alcohol,
    ValidationSeeking,
    Other,
}

impl UrgeType {
    /// Declaration order. Stats and listings follow it.
    pub const ALL: [UrgeType; 7] = [
        UrgeType::Food,
        UrgeType::Shopping,
        UrgeType::SocialMedia,
        UrgeType::Sex,
        UrgeType::Alcohol,
        UrgeType::ValidationSeeking,
        UrgeType::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            UrgeType::Food => "food",
            UrgeType::Shopping => "shopping",
            UrgeType::SocialMedia => "social_media",
            UrgeType::Sex => "sex",
            UrgeType::Alcohol => "alcohol",
            UrgeType::ValidationSeeking => "validation_seeking",
            UrgeType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgeType::Food => "Food",
            UrgeType::Shopping => "Shopping",
            UrgeType::SocialMedia => "Social Media",
            UrgeType::Sex => "Sex/Porn",
            UrgeType::Alcohol => "Alcohol",
            UrgeType::ValidationSeeking => "Validation-seeking",
            UrgeType::Other => "Other",
        }
    }

    /// Wording used inside generation prompts.
    pub fn prompt_term(&self) -> &'static str {
        match self {
            UrgeType::Food => "food",
            UrgeType::Shopping => "shopping",
            UrgeType::SocialMedia => "social media",
            UrgeType::Sex => "sex",
            UrgeType::Alcohol => "alcohol",
            UrgeType::ValidationSeeking => "validation-seeking",
            UrgeType::Other => "other",
        }
    }
}

impl fmt::Display for UrgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown urge type: {0}")]
pub struct UnknownUrgeType(pub String);

impl FromStr for UrgeType {
    type Err = UnknownUrgeType;

    // Accepts "social_media", "social media" and "social-media" alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        UrgeType::ALL
            .into_iter()
            .find(|t| t.id() == normalized)
            .ok_or_else(|| UnknownUrgeType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level {0} is outside 1..=10")]
pub struct LevelError(pub i64);

/// A self-rating on the 1-10 scale. Cannot be constructed out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: Level = Level(5);

    pub fn new(value: i64) -> Result<Self, LevelError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Level(value as u8))
        } else {
            Err(LevelError(value))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Level {
    type Error = LevelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Resisted,
    Acted,
}

/// The in-progress answers of one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionDraft {
    pub urge_type: Option<UrgeType>,
    pub intensity: Level,
    pub motivation: Level,
    pub ability: Level,
}

/// What the wizard shows once a suggestion arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionResult {
    pub suggestion: String,
    pub rationale: String,
}

/// Page identifiers of the surrounding app. Opaque to the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    History,
    Tools,
    Progress,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::History => "/history",
            Route::Tools => "/tools",
            Route::Progress => "/progress",
            Route::Login => "/login",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bounds() {
        assert!(Level::new(0).is_err());
        assert!(Level::new(11).is_err());
        assert_eq!(Level::new(1).map(|l| l.get()), Ok(1));
        assert_eq!(Level::new(10).map(|l| l.get()), Ok(10));
    }

    #[test]
    fn level_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Level>("7").is_ok());
        assert!(serde_json::from_str::<Level>("42").is_err());
    }

    #[test]
    fn urge_type_parses_loose_forms() {
        assert_eq!("social media".parse::<UrgeType>(), Ok(UrgeType::SocialMedia));
        assert_eq!("Validation-Seeking".parse::<UrgeType>(), Ok(UrgeType::ValidationSeeking));
        assert_eq!("alcohol".parse::<UrgeType>(), Ok(UrgeType::Alcohol));
        assert!("gambling".parse::<UrgeType>().is_err());
    }

    #[test]
    fn default_draft() {
        let draft = SessionDraft::default();
        assert_eq!(draft.urge_type, None);
        assert_eq!(draft.intensity.get(), 5);
        assert_eq!(draft.motivation.get(), 5);
        assert_eq!(draft.ability.get(), 5);
    }
}
