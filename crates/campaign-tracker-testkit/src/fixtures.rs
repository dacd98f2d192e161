//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::Path;
use std::sync::Arc;

use campaign_tracker_core::{Clock, ManualClock, Timestamp};
use campaign_tracker_store::{
    MemoryTracker, SqliteTracker, StorageLocation, TrackerConfig, ViewTracker,
};
use tempfile::TempDir;

/// Start time of fixture clocks: 2023-11-14T22:13:20Z.
pub const FIXTURE_EPOCH: Timestamp = 1_700_000_000_000;

/// A temporary storage directory plus a manual clock.
///
/// The directory is removed when the fixture is dropped.
pub struct TestFixture {
    pub dir: TempDir,
    pub clock: Arc<ManualClock>,
    pub config: TrackerConfig,
}

impl TestFixture {
    /// Create a fixture with a fresh temp directory and default config.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create a fixture with a custom tracker configuration.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            clock: Arc::new(ManualClock::new(FIXTURE_EPOCH)),
            config,
        }
    }

    /// The fixture's storage directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Storage location inside the temp directory.
    pub fn location(&self) -> StorageLocation {
        StorageLocation::directory(self.dir.path())
    }

    /// The fixture clock as a trait object.
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// A closed SQLite tracker on the fixture clock.
    pub fn tracker(&self) -> SqliteTracker {
        SqliteTracker::with_clock(self.config.clone(), self.clock())
    }

    /// A SQLite tracker already opened on the fixture location.
    pub fn open_tracker(&self) -> SqliteTracker {
        let tracker = self.tracker();
        tracker.open(self.location());
        tracker
    }

    /// An in-memory tracker opened on the fixture clock.
    pub fn memory_tracker(&self) -> MemoryTracker {
        let tracker = MemoryTracker::with_clock(self.clock());
        tracker.open(StorageLocation::InMemory);
        tracker
    }

    /// Delete the fixture database, as a host app clearing its data would.
    pub fn clear_database(&self) {
        self.location()
            .delete_database(&self.config)
            .expect("delete database");
    }

    /// Move the clock forward and return the new time.
    pub fn advance(&self, millis: i64) -> Timestamp {
        self.clock.advance(millis)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_tracker_core::Occurrence;
    use campaign_tracker_store::TrackerStatus;

    #[test]
    fn test_fixture_tracker_starts_closed() {
        let fixture = TestFixture::new();
        let tracker = fixture.tracker();
        assert_eq!(tracker.status(), TrackerStatus::Closed);
    }

    #[test]
    fn test_fixture_clock_drives_timestamps() {
        let fixture = TestFixture::new();
        let tracker = fixture.open_tracker();

        tracker.track_view_event("a").unwrap();
        let later = fixture.advance(250);
        tracker.track_view_event("a").unwrap();

        assert_eq!(tracker.get_occurrence("a").unwrap(), Occurrence::new(2, later));
    }

    #[test]
    fn test_clear_database_resets_counts() {
        let fixture = TestFixture::new();
        let tracker = fixture.open_tracker();
        tracker.track_view_event("a").unwrap();
        tracker.close();

        fixture.clear_database();

        let tracker = fixture.open_tracker();
        assert_eq!(tracker.get_occurrence("a").unwrap(), Occurrence::NEVER);
    }
}
