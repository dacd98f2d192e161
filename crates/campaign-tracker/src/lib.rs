//! # Campaign Tracker
//!
//! The unified API for on-device campaign view tracking: how many times each
//! campaign was shown, and when it was last shown.
//!
//! ## Overview
//!
//! The tracker is a small durable store with an explicit lifecycle:
//!
//! - **Open**: bind the tracker to a storage location
//! - **Track / query**: increment and read per-campaign counters
//! - **Close**: release the database handle
//!
//! Reads and writes made while the tracker is closed fail with
//! `TrackerUnavailable`; nothing is written.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campaign_tracker::{SharedTracker, StorageLocation};
//!
//! async fn example() {
//!     let tracker = SharedTracker::sqlite();
//!     tracker
//!         .open(StorageLocation::directory("/data/app"))
//!         .await
//!         .unwrap();
//!
//!     let event = tracker.track_view_event("spring-sale").await.unwrap();
//!     println!("shown {} times", event.count());
//!
//!     tracker.close().await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `campaign_tracker::core` - Campaign ids, occurrences, clocks
//! - `campaign_tracker::store` - Trackers, configuration, storage locations

pub mod error;
pub mod tracker;

// Re-export component crates
pub use campaign_tracker_core as core;
pub use campaign_tracker_store as store;

// Re-export main types for convenience
pub use error::{Result, TrackerError};
pub use tracker::SharedTracker;

// Re-export commonly used types
pub use campaign_tracker_core::{
    CampaignId, Clock, CountedViewEvent, ManualClock, Occurrence, SystemClock, Timestamp,
};
pub use campaign_tracker_store::{
    MemoryTracker, SqliteTracker, StorageLocation, StoreError, TrackerConfig, TrackerStatus,
    ViewTracker,
};
