//! ViewTracker trait: the contract the rest of the SDK relies on.
//!
//! Campaign selection and display scheduling only ever talk to a tracker
//! through this trait. Implementations include SQLite (primary) and
//! in-memory (for tests and hosts without a filesystem).

use std::collections::HashMap;

use campaign_tracker_core::{CampaignId, CountedViewEvent, Occurrence, Timestamp};

use crate::config::StorageLocation;
use crate::error::{Result, StoreError};

/// A keyed view counter with an explicit open/close lifecycle.
///
/// A tracker starts closed. Every read or write made while closed fails with
/// [`StoreError::TrackerUnavailable`](crate::StoreError::TrackerUnavailable)
/// and leaves stored data untouched.
///
/// # Design Notes
///
/// - **Absence is zero**: a campaign that was never tracked reads as
///   [`Occurrence::NEVER`].
/// - **Atomic increments**: count and timestamp change together or not at all.
/// - **Monotonic**: counts only grow; timestamps never move backwards.
pub trait ViewTracker: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind the tracker to `location`. No-op if already open.
    fn open(&self, location: StorageLocation);

    /// Release the backing handle and return to the closed state.
    ///
    /// Never fails; safe to call repeatedly or on a tracker never opened.
    fn close(&self);

    /// Whether the tracker is open.
    fn is_open(&self) -> bool;

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Count and last-occurrence timestamp of a campaign.
    fn get_occurrence(&self, campaign_id: &str) -> Result<Occurrence>;

    /// Timestamp of the latest tracked view, 0 if never tracked.
    fn campaign_last_occurrence(&self, campaign_id: &str) -> Result<Timestamp> {
        Ok(self.get_occurrence(campaign_id)?.last_occurrence)
    }

    /// View counts for several campaigns. Never-tracked ids map to 0.
    fn get_view_counts(&self, campaign_ids: &[CampaignId]) -> Result<HashMap<CampaignId, u64>> {
        if campaign_ids.is_empty() && !self.is_open() {
            return Err(StoreError::TrackerUnavailable);
        }
        campaign_ids
            .iter()
            .map(|id| -> Result<(CampaignId, u64)> {
                Ok((id.clone(), self.get_occurrence(id.as_str())?.view_count))
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Record one view of `campaign_id` at the tracker's current time.
    fn track_view_event(&self, campaign_id: &str) -> Result<CountedViewEvent>;

    /// Record one view of `campaign_id` at `timestamp`.
    ///
    /// Creates the row with a count of 1 if absent, otherwise increments it.
    /// The stored timestamp becomes `max(stored, timestamp)`.
    fn track_view_event_at(
        &self,
        campaign_id: &str,
        timestamp: Timestamp,
    ) -> Result<CountedViewEvent>;
}
