//! Proptest generators for property-based testing.

use std::collections::HashMap;

use proptest::prelude::*;

use campaign_tracker_core::{CampaignId, Occurrence, Timestamp};
use campaign_tracker_store::{Result, ViewTracker};

/// Generate an arbitrary opaque campaign id, including empty and non-ASCII.
pub fn campaign_id() -> impl Strategy<Value = CampaignId> {
    prop_oneof![
        "[A-Za-z][A-Za-z0-9_-]{0,31}",
        ".{0,16}",
    ]
    .prop_map(CampaignId::from)
}

/// Generate a small pool of distinct campaign ids.
pub fn campaign_pool(max: usize) -> impl Strategy<Value = Vec<CampaignId>> {
    prop::collection::hash_set(campaign_id(), 1..=max.max(1))
        .prop_map(|set| set.into_iter().collect())
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    0i64..=i64::MAX / 2
}

/// One scripted view event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStep {
    /// Index into the campaign pool.
    pub campaign: usize,
    /// Timestamp of the view; may go backwards.
    pub at: Timestamp,
}

/// A pool of campaigns and views to track against it.
#[derive(Debug, Clone)]
pub struct TrackScript {
    pub campaigns: Vec<CampaignId>,
    pub steps: Vec<TrackStep>,
}

impl Arbitrary for TrackScript {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        campaign_pool(8)
            .prop_flat_map(|campaigns| {
                let len = campaigns.len();
                let steps = prop::collection::vec(
                    (0..len, 0i64..=1_000_000i64)
                        .prop_map(|(campaign, at)| TrackStep { campaign, at }),
                    0..64,
                );
                (Just(campaigns), steps)
            })
            .prop_map(|(campaigns, steps)| TrackScript { campaigns, steps })
            .boxed()
    }
}

impl TrackScript {
    /// The occurrences a correct tracker holds after running the script.
    pub fn expected(&self) -> HashMap<CampaignId, Occurrence> {
        let mut model: HashMap<CampaignId, Occurrence> = HashMap::new();
        for step in &self.steps {
            let entry = model
                .entry(self.campaigns[step.campaign].clone())
                .or_default();
            *entry = entry.record(step.at);
        }
        model
    }

    /// Run every step against an open tracker.
    pub fn apply<T: ViewTracker + ?Sized>(&self, tracker: &T) -> Result<()> {
        for step in &self.steps {
            tracker.track_view_event_at(self.campaigns[step.campaign].as_str(), step.at)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestFixture;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_script_matches_model_on_sqlite(script: TrackScript) {
            let fixture = TestFixture::new();
            let tracker = fixture.open_tracker();

            script.apply(&tracker).unwrap();

            let expected = script.expected();
            for id in &script.campaigns {
                let want = expected.get(id).copied().unwrap_or(Occurrence::NEVER);
                prop_assert_eq!(tracker.get_occurrence(id.as_str()).unwrap(), want);
            }

            let counts = tracker.get_view_counts(&script.campaigns).unwrap();
            let total: u64 = counts.values().sum();
            prop_assert_eq!(total, script.steps.len() as u64);
        }

        #[test]
        fn test_script_matches_model_in_memory(script: TrackScript) {
            let fixture = TestFixture::new();
            let tracker = fixture.memory_tracker();

            script.apply(&tracker).unwrap();

            for (id, want) in script.expected() {
                prop_assert_eq!(tracker.get_occurrence(id.as_str()).unwrap(), want);
            }
        }

        #[test]
        fn test_closed_tracker_rejects_any_id(id in campaign_id(), at in timestamp()) {
            let fixture = TestFixture::new();
            let tracker = fixture.tracker();

            prop_assert!(tracker.track_view_event_at(id.as_str(), at).unwrap_err().is_unavailable());
            prop_assert!(tracker.get_occurrence(id.as_str()).unwrap_err().is_unavailable());
        }
    }
}
