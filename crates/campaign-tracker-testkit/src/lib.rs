//! # Campaign Tracker Testkit
//!
//! Testing utilities for the campaign tracker.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a temp-dir storage location plus a manual clock, with
//!   factories for closed, open and in-memory trackers
//! - **Generators**: Proptest strategies for campaign ids and track scripts,
//!   with a reference model of the expected occurrences
//!
//! ## Test Fixtures
//!
//! ```rust
//! use campaign_tracker_testkit::fixtures::TestFixture;
//! use campaign_tracker_store::ViewTracker;
//!
//! let fixture = TestFixture::new();
//! let tracker = fixture.open_tracker();
//! tracker.track_view_event("MyCampaign1").unwrap();
//! fixture.advance(1_000);
//! tracker.track_view_event("MyCampaign1").unwrap();
//! assert_eq!(tracker.get_occurrence("MyCampaign1").unwrap().view_count, 2);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use campaign_tracker_testkit::{TestFixture, TrackScript};
//!
//! proptest! {
//!     #[test]
//!     fn counts_match_model(script: TrackScript) {
//!         let fixture = TestFixture::new();
//!         let tracker = fixture.open_tracker();
//!         script.apply(&tracker).unwrap();
//!         for (id, want) in script.expected() {
//!             prop_assert_eq!(tracker.get_occurrence(id.as_str()).unwrap(), want);
//!         }
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{TestFixture, FIXTURE_EPOCH};
pub use generators::{campaign_id, campaign_pool, TrackScript, TrackStep};
