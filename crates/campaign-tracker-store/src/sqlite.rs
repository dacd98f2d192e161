//! SQLite implementation of the ViewTracker trait.
//!
//! This is the primary occurrence store. The tracker moves between two
//! states: `Closed`, and `Open` with a schema manager plus an optional
//! read/write connection that is created on first access.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use campaign_tracker_core::{
    CampaignId, Clock, CountedViewEvent, Occurrence, SystemClock, Timestamp,
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info, trace, warn};

use crate::config::{StorageLocation, TrackerConfig};
use crate::error::{Result, StoreError};
use crate::schema::SchemaManager;
use crate::traits::ViewTracker;

/// Externally visible lifecycle state of a [`SqliteTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    /// No location bound; reads and writes fail.
    Closed,
    /// Bound to a location. `connected` is true once the read/write handle
    /// has been created by a query or track call.
    Open { connected: bool },
}

enum TrackerState {
    Closed,
    Open {
        schema: SchemaManager,
        conn: Option<Connection>,
    },
}

/// SQLite-backed occurrence store.
///
/// Thread-safe via an internal Mutex: one instance can be shared between
/// callers, and each storage access runs in its own transaction. Several
/// instances on the same file serialize through SQLite's write lock.
pub struct SqliteTracker {
    state: Mutex<TrackerState>,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    connections_opened: AtomicU64,
}

impl SqliteTracker {
    /// Create a closed tracker with the default configuration and the
    /// system clock.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create a closed tracker with `config` and the system clock.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a closed tracker with `config` and a custom time source.
    pub fn with_clock(config: TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(TrackerState::Closed),
            config,
            clock,
            connections_opened: AtomicU64::new(0),
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TrackerStatus {
        match &*self.lock_recover() {
            TrackerState::Closed => TrackerStatus::Closed,
            TrackerState::Open { conn, .. } => TrackerStatus::Open {
                connected: conn.is_some(),
            },
        }
    }

    /// The bound location, if open.
    pub fn location(&self) -> Option<StorageLocation> {
        match &*self.lock_recover() {
            TrackerState::Closed => None,
            TrackerState::Open { schema, .. } => Some(schema.location().clone()),
        }
    }

    /// Configuration used for new connections.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of read/write handles created over this tracker's lifetime.
    ///
    /// A handle is never reused after `close`, so a query after a
    /// close/open cycle always increments this.
    pub fn connections_opened(&self) -> u64 {
        self.connections_opened.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, TrackerState>> {
        self.state
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    /// Lifecycle transitions must not fail, so they take the state even if a
    /// previous holder panicked.
    fn lock_recover(&self) -> MutexGuard<'_, TrackerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the read/write connection, creating it if needed.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut state = self.lock()?;
        let TrackerState::Open { schema, conn } = &mut *state else {
            return Err(StoreError::TrackerUnavailable);
        };

        let conn = match conn {
            Some(conn) => conn,
            None => {
                let fresh = schema.connect()?;
                self.connections_opened.fetch_add(1, Ordering::SeqCst);
                conn.insert(fresh)
            }
        };
        f(conn)
    }
}

impl Default for SqliteTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SqliteTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTracker")
            .field("status", &self.status())
            .field("config", &self.config)
            .field("connections_opened", &self.connections_opened())
            .finish()
    }
}

impl ViewTracker for SqliteTracker {
    fn open(&self, location: StorageLocation) {
        let mut state = self.lock_recover();

        if let TrackerState::Open { schema, .. } = &*state {
            if schema.location() == &location {
                debug!(%location, "campaign tracker already open");
            } else {
                warn!(
                    current = %schema.location(),
                    requested = %location,
                    "campaign tracker already open on another location, keeping it"
                );
            }
            return;
        }

        debug!(%location, "opening campaign tracker");
        *state = TrackerState::Open {
            schema: SchemaManager::new(location, self.config.clone(), self.clock.clone()),
            conn: None,
        };
    }

    fn close(&self) {
        let previous = std::mem::replace(&mut *self.lock_recover(), TrackerState::Closed);

        match previous {
            TrackerState::Closed => debug!("campaign tracker already closed"),
            TrackerState::Open { schema, conn: None } => {
                debug!(location = %schema.location(), "campaign tracker closed before first access");
            }
            TrackerState::Open {
                schema,
                conn: Some(conn),
            } => {
                match conn.close() {
                    Ok(()) => info!(location = %schema.location(), "campaign tracker database closed"),
                    Err((_conn, e)) => {
                        warn!(location = %schema.location(), error = %e, "failed to close campaign tracker database");
                    }
                }
            }
        }
    }

    fn is_open(&self) -> bool {
        matches!(&*self.lock_recover(), TrackerState::Open { .. })
    }

    fn get_occurrence(&self, campaign_id: &str) -> Result<Occurrence> {
        trace!(campaign_id, "reading campaign occurrence");
        self.with_conn(|conn| read_occurrence(conn, campaign_id))
    }

    fn get_view_counts(&self, campaign_ids: &[CampaignId]) -> Result<HashMap<CampaignId, u64>> {
        if campaign_ids.is_empty() {
            return match self.status() {
                TrackerStatus::Closed => Err(StoreError::TrackerUnavailable),
                TrackerStatus::Open { .. } => Ok(HashMap::new()),
            };
        }

        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut counts = HashMap::with_capacity(campaign_ids.len());
            for id in campaign_ids {
                counts.insert(id.clone(), read_occurrence(&tx, id.as_str())?.view_count);
            }
            tx.commit()?;
            Ok(counts)
        })
    }

    fn track_view_event(&self, campaign_id: &str) -> Result<CountedViewEvent> {
        self.track_view_event_at(campaign_id, self.clock.now_millis())
    }

    fn track_view_event_at(
        &self,
        campaign_id: &str,
        timestamp: Timestamp,
    ) -> Result<CountedViewEvent> {
        let occurrence = self.with_conn(|conn| record_view(conn, campaign_id, timestamp))?;
        trace!(
            campaign_id,
            view_count = occurrence.view_count,
            last_occurrence = occurrence.last_occurrence,
            "tracked campaign view"
        );
        Ok(CountedViewEvent::new(CampaignId::from(campaign_id), occurrence))
    }
}

fn row_to_occurrence(row: &rusqlite::Row<'_>) -> rusqlite::Result<Occurrence> {
    let view_count: i64 = row.get("view_count")?;
    let last_occurrence: i64 = row.get("last_occurrence")?;
    let view_count = u64::try_from(view_count)
        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, view_count))?;
    Ok(Occurrence::new(view_count, last_occurrence))
}

fn read_occurrence(conn: &Connection, campaign_id: &str) -> Result<Occurrence> {
    let occurrence = conn
        .query_row(
            "SELECT view_count, last_occurrence FROM campaign_occurrences WHERE campaign_id = ?1",
            params![campaign_id],
            row_to_occurrence,
        )
        .optional()?;
    Ok(occurrence.unwrap_or(Occurrence::NEVER))
}

/// Increment the counter and timestamp of `campaign_id` in one transaction.
///
/// The transaction is IMMEDIATE so the write lock is held from the first
/// statement: two trackers can never both read the old count.
fn record_view(conn: &mut Connection, campaign_id: &str, timestamp: Timestamp) -> Result<Occurrence> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let updated = tx.execute(
        "UPDATE campaign_occurrences
         SET view_count = view_count + 1,
             last_occurrence = MAX(last_occurrence, ?2)
         WHERE campaign_id = ?1",
        params![campaign_id, timestamp],
    )?;

    if updated == 0 {
        tx.execute(
            "INSERT INTO campaign_occurrences (campaign_id, view_count, last_occurrence)
             VALUES (?1, 1, ?2)",
            params![campaign_id, timestamp],
        )?;
    }

    let occurrence = read_occurrence(&tx, campaign_id)?;
    tx.commit()?;
    Ok(occurrence)
}
