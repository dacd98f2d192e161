//! Strong type definitions for the campaign tracker.
//!
//! Campaign identifiers are newtypes so they cannot be confused with other
//! strings flowing through the SDK.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// An opaque campaign identifier.
///
/// The tracker never validates or interprets the contents: empty strings and
/// arbitrary Unicode are stored verbatim.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    /// Create a new CampaignId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CampaignId({:?})", self.0)
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CampaignId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CampaignId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CampaignId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CampaignId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for CampaignId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

/// Aggregated view history of a single campaign.
///
/// A campaign that was never tracked has no stored row; it is reported as
/// [`Occurrence::NEVER`] rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Occurrence {
    /// Number of tracked views.
    pub view_count: u64,
    /// Timestamp of the most recent tracked view (Unix ms), 0 if never tracked.
    pub last_occurrence: Timestamp,
}

impl Occurrence {
    /// The occurrence of a campaign that was never tracked.
    pub const NEVER: Self = Self {
        view_count: 0,
        last_occurrence: 0,
    };

    /// Create an occurrence from its parts.
    pub const fn new(view_count: u64, last_occurrence: Timestamp) -> Self {
        Self {
            view_count,
            last_occurrence,
        }
    }

    /// Whether at least one view was tracked.
    pub const fn is_tracked(&self) -> bool {
        self.view_count > 0
    }

    /// The occurrence after recording one more view at `at`.
    ///
    /// The timestamp never moves backwards, even if `at` is older than the
    /// stored value.
    pub fn record(self, at: Timestamp) -> Self {
        Self {
            view_count: self.view_count.saturating_add(1),
            last_occurrence: self.last_occurrence.max(at),
        }
    }
}

/// The state of a campaign right after a view was tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedViewEvent {
    /// The tracked campaign.
    pub campaign_id: CampaignId,
    /// Count and timestamp including the view just tracked.
    #[serde(flatten)]
    pub occurrence: Occurrence,
}

impl CountedViewEvent {
    /// Create a counted event.
    pub fn new(campaign_id: CampaignId, occurrence: Occurrence) -> Self {
        Self {
            campaign_id,
            occurrence,
        }
    }

    /// Number of views including this one.
    pub fn count(&self) -> u64 {
        self.occurrence.view_count
    }

    /// Timestamp stored for this campaign after the view.
    pub fn last_occurrence(&self) -> Timestamp {
        self.occurrence.last_occurrence
    }
}
