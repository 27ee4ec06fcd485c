use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::types::{Level, Outcome, UrgeType};

/// One completed wizard session. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: Uuid,
    pub urge_type: UrgeType,
    pub intensity: Level,
    pub outcome: Outcome,
    pub occurred_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(session_id: Uuid, urge_type: UrgeType, intensity: Level, outcome: Outcome) -> Self {
        Self {
            session_id,
            urge_type,
            intensity,
            outcome,
            occurred_at: Utc::now(),
        }
    }
}
