//! Progress Tracker: the import progress record and the
//! active-import marker, both persisted through the host's
//! [`hevy_sync_core::interfaces::PropertyStore`] — a plain string-keyed
//! store, unlike the TTL-bearing [`hevy_sync_core::DurableStore`] behind
//! the response cache and rate-limit tracker. Neither record
//! expires on its own; the orchestrator is the sole writer of the
//! progress record, and this tracker is the sole writer of the active
//! marker.

mod config;
mod events;

pub use config::{ProgressConfig, IMPORT_ACTIVE_KEY, IMPORT_PROGRESS_KEY};
pub use events::ProgressEvent;

use chrono::{DateTime, Utc};
use hevy_sync_core::{Clock, PropertyStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "metrics")]
use metrics::counter;

/// The set of completed step names plus any deferred operation names.
/// Serialized as JSON through the property store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportProgressRecord {
    pub completed_steps: HashSet<String>,
    pub deferred_operations: HashSet<String>,
}

impl ImportProgressRecord {
    pub fn is_empty(&self) -> bool {
        self.completed_steps.is_empty() && self.deferred_operations.is_empty()
    }
}

/// `{run-id, started-at, last-heartbeat}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveImportMarker {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}

pub struct ProgressTracker<P: PropertyStore, C: Clock> {
    config: ProgressConfig,
    store: Arc<P>,
    clock: Arc<C>,
}

impl<P: PropertyStore, C: Clock> ProgressTracker<P, C> {
    pub fn new(config: ProgressConfig, store: Arc<P>, clock: Arc<C>) -> Self {
        Self { config, store, clock }
    }

    /// The configured heartbeat refresh interval (`ACTIVE_IMPORT_HEARTBEAT_MS`).
    pub fn heartbeat_interval(&self) -> Duration {
        self.config.heartbeat_interval
    }

    /// Reads the progress record, or the empty record if none has ever been
    /// written (or a corrupt one was, in which case it's treated as empty).
    pub async fn load_progress(&self) -> ImportProgressRecord {
        match self.store.get(IMPORT_PROGRESS_KEY).await {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => ImportProgressRecord::default(),
        }
    }

    /// Writes the progress record; called by the orchestrator at every
    /// checkpoint.
    pub async fn save_progress(&self, record: &ImportProgressRecord) {
        if let Ok(raw) = serde_json::to_string(record) {
            self.store.set(IMPORT_PROGRESS_KEY, &raw).await;
        }

        self.config.event_listeners.emit(&ProgressEvent::Checkpointed {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            completed_steps: record.completed_steps.len(),
        });
        #[cfg(feature = "metrics")]
        counter!("progress_checkpoints_total", "tracker" => self.config.name.clone()).increment(1);
    }

    /// Clears the progress record; called on successful completion.
    pub async fn clear_progress(&self) {
        self.store.delete(IMPORT_PROGRESS_KEY).await;

        self.config.event_listeners.emit(&ProgressEvent::ProgressCleared {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
        });
    }

    /// Writes the active-import marker with the current wall-clock time as
    /// both `started_at` and `last_heartbeat`.
    pub async fn mark_active(&self, run_id: impl Into<String>) {
        let now = self.clock.now_utc();
        let marker = ActiveImportMarker {
            run_id: run_id.into(),
            started_at: now,
            last_heartbeat: now,
        };
        self.write_marker(&marker).await;

        self.config.event_listeners.emit(&ProgressEvent::MarkedActive {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
        });
    }

    /// Refreshes `last_heartbeat` on the existing marker. A no-op if no
    /// marker is currently set (the run never called `mark_active`, or
    /// another process cleared it).
    pub async fn heartbeat(&self) {
        let Some(mut marker) = self.read_marker().await else {
            return;
        };
        marker.last_heartbeat = self.clock.now_utc();
        self.write_marker(&marker).await;

        self.config.event_listeners.emit(&ProgressEvent::HeartbeatSent {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
        });
        #[cfg(feature = "metrics")]
        counter!("progress_heartbeats_total", "tracker" => self.config.name.clone()).increment(1);
    }

    /// True iff a marker exists and its heartbeat is fresher than
    /// `ACTIVE_IMPORT_STALE_MS`. A stale marker is treated as absent
    /// — the crashed holder's lock is presumed abandoned.
    pub async fn is_active(&self) -> bool {
        let Some(marker) = self.read_marker().await else {
            return false;
        };

        let age = self.clock.now_utc() - marker.last_heartbeat;
        let age_std = age.to_std().unwrap_or(Duration::ZERO);

        if age_std >= self.config.stale_after {
            self.config.event_listeners.emit(&ProgressEvent::StaleMarkerIgnored {
                pattern_name: self.config.name.clone(),
                timestamp: Instant::now(),
            });
            return false;
        }

        true
    }

    /// Removes the active-import marker; called from the orchestrator's
    /// finalizer on every exit path.
    pub async fn clear_active(&self) {
        self.store.delete(IMPORT_ACTIVE_KEY).await;

        self.config.event_listeners.emit(&ProgressEvent::MarkedInactive {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
        });
    }

    async fn read_marker(&self) -> Option<ActiveImportMarker> {
        let raw = self.store.get(IMPORT_ACTIVE_KEY).await?;
        serde_json::from_str(&raw).ok()
    }

    async fn write_marker(&self, marker: &ActiveImportMarker) {
        if let Ok(raw) = serde_json::to_string(marker) {
            self.store.set(IMPORT_ACTIVE_KEY, &raw).await;
        }
    }
}
