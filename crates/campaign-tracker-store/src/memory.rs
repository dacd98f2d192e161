//! In-memory implementation of the ViewTracker trait.
//!
//! Same lifecycle and semantics as SQLite, with no persistence. Rows are kept
//! per storage location: closing and reopening the same directory or file
//! finds its rows again, another location starts empty, and
//! [`StorageLocation::InMemory`] loses its rows on close. Everything is lost
//! when the tracker is dropped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use campaign_tracker_core::{
    CampaignId, Clock, CountedViewEvent, Occurrence, SystemClock, Timestamp,
};

use crate::config::StorageLocation;
use crate::error::{Result, StoreError};
use crate::traits::ViewTracker;

type Occurrences = HashMap<CampaignId, Occurrence>;

/// In-memory view tracker.
///
/// Thread-safe via RwLock.
#[derive(Debug)]
pub struct MemoryTracker {
    inner: RwLock<MemoryTrackerInner>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Default)]
struct MemoryTrackerInner {
    /// Bound location while open.
    location: Option<StorageLocation>,

    /// Occurrences by campaign, per location.
    stores: HashMap<StorageLocation, Occurrences>,
}

impl MemoryTrackerInner {
    fn occurrences(&self) -> Result<Option<&Occurrences>> {
        let location = self.location.as_ref().ok_or(StoreError::TrackerUnavailable)?;
        Ok(self.stores.get(location))
    }

    fn occurrences_mut(&mut self) -> Result<&mut Occurrences> {
        let location = self.location.as_ref().ok_or(StoreError::TrackerUnavailable)?;
        Ok(self.stores.entry(location.clone()).or_default())
    }
}

impl MemoryTracker {
    /// Create a closed tracker using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a closed tracker with a custom time source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(MemoryTrackerInner::default()),
            clock,
        }
    }

    /// Number of tracked campaigns at the open location, 0 while closed.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .ok()
            .and_then(|i| i.occurrences().ok().flatten().map(HashMap::len))
            .unwrap_or(0)
    }

    /// Whether no campaign was tracked at the open location.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Poisoned(e.to_string())
}

impl ViewTracker for MemoryTracker {
    fn open(&self, location: StorageLocation) {
        let mut inner = self.inner.write().unwrap_or_else(|p| p.into_inner());
        if inner.location.is_none() {
            inner.location = Some(location);
        }
    }

    fn close(&self) {
        let mut inner = self.inner.write().unwrap_or_else(|p| p.into_inner());
        if let Some(StorageLocation::InMemory) = inner.location.take() {
            inner.stores.remove(&StorageLocation::InMemory);
        }
    }

    fn is_open(&self) -> bool {
        self.inner
            .read()
            .map(|i| i.location.is_some())
            .unwrap_or(false)
    }

    fn get_occurrence(&self, campaign_id: &str) -> Result<Occurrence> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .occurrences()?
            .and_then(|rows| rows.get(campaign_id).copied())
            .unwrap_or(Occurrence::NEVER))
    }

    fn track_view_event(&self, campaign_id: &str) -> Result<CountedViewEvent> {
        self.track_view_event_at(campaign_id, self.clock.now_millis())
    }

    fn track_view_event_at(
        &self,
        campaign_id: &str,
        timestamp: Timestamp,
    ) -> Result<CountedViewEvent> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let rows = inner.occurrences_mut()?;

        let id = CampaignId::from(campaign_id);
        let entry = rows.entry(id.clone()).or_default();
        *entry = entry.record(timestamp);
        Ok(CountedViewEvent::new(id, *entry))
    }
}
