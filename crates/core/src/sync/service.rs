//! Full-replace reconciliation service
//!
//! One run per origin: fetch the upstream snapshot, normalize each record,
//! then atomically replace that origin's partition of the store. Upstream
//! systems give no change feed or deletion signal, so full replace is the
//! correctness-equivalent of diffing at this volume.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use plandesk_domain::{CanonicalEvent, EventOrigin, PlanDeskError, Result, SyncReport};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::events::ports::EventRepository;
use crate::ingest::normalize;

use super::ports::{FetchOutcome, SourceAdapter};

/// Runs reconciliation for the registered synchronized origins.
///
/// Runs for the same origin are serialized through a per-origin lock; runs
/// for different origins touch disjoint partitions and may proceed
/// concurrently.
pub struct SyncService {
    repository: Arc<dyn EventRepository>,
    adapters: HashMap<EventOrigin, Arc<dyn SourceAdapter>>,
    run_locks: HashMap<EventOrigin, Mutex<()>>,
}

impl SyncService {
    /// Create a service with no registered adapters.
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository, adapters: HashMap::new(), run_locks: HashMap::new() }
    }

    /// Register the adapter feeding one origin.
    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        let origin = adapter.origin();
        self.run_locks.insert(origin, Mutex::new(()));
        self.adapters.insert(origin, adapter);
        self
    }

    /// Origins this service can reconcile.
    pub fn origins(&self) -> Vec<EventOrigin> {
        self.adapters.keys().copied().collect()
    }

    /// Run one full-replace reconciliation for `origin`.
    ///
    /// Fetch failures abort the run before any deletion, leaving the stored
    /// partition untouched. Per-record normalization failures are soft;
    /// they land in [`SyncReport::errors`] and the rest of the batch
    /// proceeds.
    #[instrument(skip(self), fields(origin = %origin))]
    pub async fn sync(&self, origin: EventOrigin) -> Result<SyncReport> {
        let adapter = self.adapters.get(&origin).ok_or_else(|| {
            PlanDeskError::InvalidInput(format!("no source adapter registered for origin {origin}"))
        })?;
        let lock = self.run_locks.get(&origin).ok_or_else(|| {
            PlanDeskError::Internal(format!("missing run lock for origin {origin}"))
        })?;
        let _guard = lock.lock().await;

        let raw_events = match adapter.fetch_events().await? {
            FetchOutcome::Available(events) => events,
            FetchOutcome::NotImplemented => {
                info!(origin = %origin, "upstream sync not implemented, clearing stale partition");
                Vec::new()
            }
        };

        let mut errors: Vec<String> = Vec::new();
        let mut batch: Vec<CanonicalEvent> = Vec::with_capacity(raw_events.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(raw_events.len());
        for raw in &raw_events {
            match normalize(origin, raw) {
                Ok(event) => {
                    let token = event.source_fingerprint.clone().unwrap_or_default();
                    if seen.insert(token.clone()) {
                        batch.push(event);
                    } else {
                        warn!(origin = %origin, fingerprint = %token, "duplicate fingerprint in upstream batch");
                        errors.push(format!(
                            "record '{token}': duplicate fingerprint, keeping first occurrence"
                        ));
                    }
                }
                Err(message) => errors.push(message),
            }
        }

        let outcome = self.repository.replace_origin(origin, &batch).await?;
        info!(
            origin = %origin,
            created = outcome.created,
            deleted = outcome.deleted,
            error_count = errors.len(),
            "sync run finished"
        );

        Ok(SyncReport { created: outcome.created, deleted: outcome.deleted, errors })
    }
}
