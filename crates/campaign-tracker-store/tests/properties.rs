//! Model-based checks: SQLite and in-memory trackers agree with a plain map.

use std::collections::HashMap;

use proptest::prelude::*;

use campaign_tracker_core::{Occurrence, Timestamp};
use campaign_tracker_store::{MemoryTracker, SqliteTracker, StorageLocation, ViewTracker};

#[derive(Debug, Clone)]
enum Action {
    Track { campaign: u8, at: Timestamp },
    Reopen,
    SwitchLocation,
    TrackWhileClosed { campaign: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        8 => (0u8..6, 0i64..10_000).prop_map(|(campaign, at)| Action::Track { campaign, at }),
        1 => Just(Action::Reopen),
        1 => Just(Action::SwitchLocation),
        1 => (0u8..6).prop_map(|campaign| Action::TrackWhileClosed { campaign }),
    ]
}

fn campaign(idx: u8) -> String {
    format!("campaign-{idx}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sqlite_matches_model(actions in prop::collection::vec(action_strategy(), 1..120)) {
        let dir = tempfile::tempdir().unwrap();
        let locations = [
            StorageLocation::directory(dir.path().join("first")),
            StorageLocation::directory(dir.path().join("second")),
        ];
        let mut current = 0;
        let mut location = locations[current].clone();

        let sqlite = SqliteTracker::new();
        let memory = MemoryTracker::new();
        sqlite.open(location.clone());
        memory.open(location.clone());

        let mut models: [HashMap<String, Occurrence>; 2] = Default::default();

        for action in actions {
            match action {
                Action::Track { campaign: idx, at } => {
                    let id = campaign(idx);
                    let before = sqlite.get_occurrence(&id).unwrap();

                    let from_sqlite = sqlite.track_view_event_at(&id, at).unwrap();
                    let from_memory = memory.track_view_event_at(&id, at).unwrap();

                    let expected = models[current].entry(id.clone()).or_default();
                    *expected = expected.record(at);

                    prop_assert_eq!(from_sqlite.occurrence, *expected);
                    prop_assert_eq!(from_memory.occurrence, *expected);

                    // Monotonic per campaign
                    prop_assert_eq!(from_sqlite.count(), before.view_count + 1);
                    prop_assert!(from_sqlite.last_occurrence() >= before.last_occurrence);
                }
                Action::Reopen => {
                    sqlite.close();
                    memory.close();
                    sqlite.open(location.clone());
                    memory.open(location.clone());
                }
                Action::SwitchLocation => {
                    sqlite.close();
                    memory.close();
                    current = 1 - current;
                    location = locations[current].clone();
                    sqlite.open(location.clone());
                    memory.open(location.clone());
                }
                Action::TrackWhileClosed { campaign: idx } => {
                    sqlite.close();
                    memory.close();
                    prop_assert!(sqlite.track_view_event(&campaign(idx)).unwrap_err().is_unavailable());
                    prop_assert!(memory.track_view_event(&campaign(idx)).unwrap_err().is_unavailable());
                    sqlite.open(location.clone());
                    memory.open(location.clone());
                }
            }
        }

        // Untouched campaigns still read as never tracked; tracked ones match
        for idx in 0u8..6 {
            let id = campaign(idx);
            let expected = models[current].get(&id).copied().unwrap_or(Occurrence::NEVER);
            prop_assert_eq!(sqlite.get_occurrence(&id).unwrap(), expected);
            prop_assert_eq!(memory.get_occurrence(&id).unwrap(), expected);
        }
    }
}
