use chrono::{TimeZone, Utc};
use uuid::Uuid;

use urgeflow::history::{compute_stats, daily_outcomes, HistoryEntry, HistoryStore, InMemoryHistoryStore};
use urgeflow::kernel::types::{Level, Outcome, UrgeType};

fn entry(urge_type: UrgeType, intensity: i64, outcome: Outcome, day: u32) -> HistoryEntry {
    let mut entry = HistoryEntry::new(Uuid::new_v4(), urge_type, Level::new(intensity).unwrap(), outcome);
    entry.occurred_at = Utc.with_ymd_and_hms(2026, 3, day, 21, 30, 0).unwrap();
    entry
}

#[test]
fn test_store_lists_newest_first() {
    let mut store = InMemoryHistoryStore::new();
    assert!(store.is_empty());

    store.append(entry(UrgeType::Food, 4, Outcome::Resisted, 1));
    store.append(entry(UrgeType::Alcohol, 9, Outcome::Acted, 2));

    let listed = store.list();
    assert_eq!(store.len(), 2);
    assert_eq!(listed[0].urge_type, UrgeType::Alcohol);
    assert_eq!(listed[1].urge_type, UrgeType::Food);
}

#[test]
fn test_stats_over_mixed_history() {
    let entries = vec![
        entry(UrgeType::Food, 8, Outcome::Acted, 1),
        entry(UrgeType::Food, 4, Outcome::Resisted, 1),
        entry(UrgeType::SocialMedia, 6, Outcome::Resisted, 3),
        entry(UrgeType::Food, 2, Outcome::Resisted, 3),
    ];

    let stats = compute_stats(&entries);
    assert_eq!(stats.sessions, 4);
    assert_eq!(stats.resisted, 3);
    assert_eq!(stats.acted, 1);
    assert!((stats.resist_rate - 0.75).abs() < f64::EPSILON);
    assert!((stats.mean_intensity - 5.0).abs() < f64::EPSILON);

    assert_eq!(stats.by_urge_type.len(), 2);
    let food = &stats.by_urge_type[0];
    assert_eq!(food.urge_type, UrgeType::Food);
    assert_eq!((food.sessions, food.resisted, food.acted), (3, 2, 1));

    let days = daily_outcomes(&entries);
    assert_eq!(days.len(), 2, "One bucket per calendar day");
    assert_eq!(days[0].day.to_string(), "2026-03-01");
    assert_eq!((days[0].resisted, days[0].acted), (1, 1));
    assert_eq!(days[1].day.to_string(), "2026-03-03");
    assert_eq!((days[1].resisted, days[1].acted), (2, 0));
}

#[test]
fn test_stats_on_empty_history() {
    let stats = compute_stats(Vec::<&HistoryEntry>::new());
    assert_eq!(stats.sessions, 0);
    assert_eq!(stats.resist_rate, 0.0);
    assert!(stats.by_urge_type.is_empty());
    assert!(daily_outcomes(Vec::<&HistoryEntry>::new()).is_empty());
}

#[test]
fn test_entry_serializes_with_wire_names() {
    let e = entry(UrgeType::SocialMedia, 7, Outcome::Acted, 5);
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(json["urge_type"], "social_media");
    assert_eq!(json["intensity"], 7);
    assert_eq!(json["outcome"], "acted");
}
