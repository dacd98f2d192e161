//! # Campaign Tracker Store
//!
//! Durable occurrence store for the campaign tracker. Records how many times
//! each campaign was shown and when it was last shown, behind an explicit
//! open/close lifecycle.
//!
//! ## Overview
//!
//! The rest of the SDK talks to the store through the [`ViewTracker`] trait.
//! The primary implementation is [`SqliteTracker`], with [`MemoryTracker`]
//! for tests and hosts without a filesystem.
//!
//! ## Key Types
//!
//! - [`ViewTracker`] - Open, close, query and track operations
//! - [`SqliteTracker`] - SQLite-based persistent tracker
//! - [`MemoryTracker`] - In-memory tracker with the same semantics
//! - [`StorageLocation`] - Where the database lives
//! - [`TrackerConfig`] - Database name and SQLite tuning
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campaign_tracker_store::{SqliteTracker, StorageLocation, ViewTracker};
//!
//! let tracker = SqliteTracker::new();
//! tracker.open(StorageLocation::directory("/data/app"));
//!
//! tracker.track_view_event("spring-sale").unwrap();
//! let occurrence = tracker.get_occurrence("spring-sale").unwrap();
//! assert_eq!(occurrence.view_count, 1);
//!
//! tracker.close();
//! assert!(tracker.get_occurrence("spring-sale").unwrap_err().is_unavailable());
//! ```
//!
//! ## Design Notes
//!
//! - **Lazy handles**: `open` only records the location; the database is
//!   opened and migrated on the first query or track.
//! - **Atomic upsert**: each track runs in a single IMMEDIATE transaction.
//! - **Closed is an error**: reads and writes while closed return
//!   [`StoreError::TrackerUnavailable`].

pub mod config;
pub mod error;
pub mod memory;
pub mod migration;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use config::{JournalMode, StorageLocation, Synchronous, TrackerConfig, DEFAULT_DATABASE_NAME};
pub use error::{Result, StoreError};
pub use memory::MemoryTracker;
pub use schema::SchemaManager;
pub use sqlite::{SqliteTracker, TrackerStatus};
pub use traits::ViewTracker;
