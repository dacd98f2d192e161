//! SharedTracker: async access to a view tracker from a tokio runtime.
//!
//! Tracker operations are short, synchronous SQLite calls. Display
//! scheduling in the SDK runs on tokio, so every call is moved onto the
//! blocking pool instead of stalling a runtime worker.

use std::collections::HashMap;
use std::sync::Arc;

use campaign_tracker_core::{CampaignId, CountedViewEvent, Occurrence, Timestamp};
use campaign_tracker_store::{SqliteTracker, StorageLocation, StoreError, ViewTracker};
use tracing::debug;

use crate::error::Result;

/// A cloneable, async handle to a [`ViewTracker`].
///
/// Clones share the same underlying tracker and therefore the same
/// open/closed state.
pub struct SharedTracker<T: ViewTracker + 'static = SqliteTracker> {
    tracker: Arc<T>,
}

impl<T: ViewTracker + 'static> Clone for SharedTracker<T> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl SharedTracker<SqliteTracker> {
    /// A shared handle over a closed SQLite tracker with default settings.
    pub fn sqlite() -> Self {
        Self::new(SqliteTracker::new())
    }
}

impl<T: ViewTracker + 'static> SharedTracker<T> {
    /// Wrap a tracker.
    pub fn new(tracker: T) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }

    /// Wrap a tracker that is already shared.
    pub fn from_arc(tracker: Arc<T>) -> Self {
        Self { tracker }
    }

    /// Get the tracker reference for synchronous use.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Run a storage call on the blocking pool.
    async fn run<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&T) -> std::result::Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let tracker = Arc::clone(&self.tracker);
        let result = tokio::task::spawn_blocking(move || f(&tracker)).await?;
        Ok(result?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind the tracker to `location`. See [`ViewTracker::open`].
    pub async fn open(&self, location: StorageLocation) -> Result<()> {
        self.run(move |t| {
            t.open(location);
            Ok(())
        })
        .await
    }

    /// Release the backing handle. See [`ViewTracker::close`].
    ///
    /// Only fails if the blocking task itself could not run.
    pub async fn close(&self) -> Result<()> {
        debug!("closing shared campaign tracker");
        self.run(|t| {
            t.close();
            Ok(())
        })
        .await
    }

    /// Whether the tracker is open.
    ///
    /// Reading the state can wait on a storage call in flight, so it runs on
    /// the blocking pool too.
    pub async fn is_open(&self) -> Result<bool> {
        self.run(|t| Ok(t.is_open())).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Count and last-occurrence timestamp of a campaign.
    pub async fn get_occurrence(&self, campaign_id: impl Into<CampaignId>) -> Result<Occurrence> {
        let id = campaign_id.into();
        self.run(move |t| t.get_occurrence(id.as_str())).await
    }

    /// Timestamp of the latest tracked view, 0 if never tracked.
    pub async fn campaign_last_occurrence(
        &self,
        campaign_id: impl Into<CampaignId>,
    ) -> Result<Timestamp> {
        let id = campaign_id.into();
        self.run(move |t| t.campaign_last_occurrence(id.as_str())).await
    }

    /// View counts for several campaigns.
    pub async fn get_view_counts(
        &self,
        campaign_ids: Vec<CampaignId>,
    ) -> Result<HashMap<CampaignId, u64>> {
        self.run(move |t| t.get_view_counts(&campaign_ids)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Record one view at the tracker's current time.
    pub async fn track_view_event(
        &self,
        campaign_id: impl Into<CampaignId>,
    ) -> Result<CountedViewEvent> {
        let id = campaign_id.into();
        self.run(move |t| t.track_view_event(id.as_str())).await
    }

    /// Record one view at `timestamp`.
    pub async fn track_view_event_at(
        &self,
        campaign_id: impl Into<CampaignId>,
        timestamp: Timestamp,
    ) -> Result<CountedViewEvent> {
        let id = campaign_id.into();
        self.run(move |t| t.track_view_event_at(id.as_str(), timestamp))
            .await
    }
}
