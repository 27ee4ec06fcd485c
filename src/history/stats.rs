use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::types::HistoryEntry;
use crate::kernel::types::{Outcome, UrgeType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    pub sessions: u64,
    pub resisted: u64,
    pub acted: u64,
    /// resisted / sessions, 0.0 with no sessions.
    pub resist_rate: f64,
    pub mean_intensity: f64,
    pub by_urge_type: Vec<UrgeTypeStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrgeTypeStats {
    pub urge_type: UrgeType,
    pub sessions: u64,
    pub resisted: u64,
    pub acted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyOutcomes {
    pub day: NaiveDate,
    pub resisted: u64,
    pub acted: u64,
}

/// Pure aggregation over whatever the store currently holds.
pub fn compute_stats<'a, I>(entries: I) -> HistoryStats
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    let mut stats = HistoryStats::default();
    let mut intensity_sum: u64 = 0;
    let mut per_type: HashMap<UrgeType, (u64, u64)> = HashMap::new();

    for entry in entries {
        stats.sessions += 1;
        intensity_sum += u64::from(entry.intensity.get());

        let counts = per_type.entry(entry.urge_type).or_default();
        match entry.outcome {
            Outcome::Resisted => {
                stats.resisted += 1;
                counts.0 += 1;
            }
            Outcome::Acted => {
                stats.acted += 1;
                counts.1 += 1;
            }
        }
    }

    if stats.sessions > 0 {
        stats.resist_rate = stats.resisted as f64 / stats.sessions as f64;
        stats.mean_intensity = intensity_sum as f64 / stats.sessions as f64;
    }

    stats.by_urge_type = UrgeType::ALL
        .into_iter()
        .filter_map(|urge_type| {
            per_type.get(&urge_type).map(|&(resisted, acted)| UrgeTypeStats {
                urge_type,
                sessions: resisted + acted,
                resisted,
                acted,
            })
        })
        .collect();

    stats
}

/// Resisted/acted counts per UTC calendar day, oldest day first.
pub fn daily_outcomes<'a, I>(entries: I) -> Vec<DailyOutcomes>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    let mut days: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for entry in entries {
        let counts = days.entry(entry.occurred_at.date_naive()).or_default();
        match entry.outcome {
            Outcome::Resisted => counts.0 += 1,
            Outcome::Acted => counts.1 += 1,
        }
    }

    days.into_iter()
        .map(|(day, (resisted, acted))| DailyOutcomes { day, resisted, acted })
        .collect()
}
