//! # Campaign Tracker Core
//!
//! Pure primitives for the campaign tracker: campaign identifiers, view
//! occurrences, and the clock used to timestamp them.
//!
//! This crate contains no I/O and no storage. Persistence lives in
//! `campaign-tracker-store`.
//!
//! ## Key Types
//!
//! - [`CampaignId`] - Opaque identifier supplied by the caller
//! - [`Occurrence`] - View count plus last-occurrence timestamp
//! - [`CountedViewEvent`] - The state of a campaign right after a tracked view
//! - [`Clock`] - Source of millisecond timestamps

pub mod clock;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{CampaignId, CountedViewEvent, Occurrence, Timestamp};
