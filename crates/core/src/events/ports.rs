//! Event store port interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plandesk_domain::{CanonicalEvent, EventOrigin, Result};

/// Counts from a transactional partition replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub deleted: usize,
    pub created: usize,
}

/// Persistence operations over the single canonical event collection.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Atomically delete the origin's partition and insert the new batch.
    ///
    /// Delete-then-insert must happen inside one transaction; a crash in
    /// between must not leave the partition empty.
    async fn replace_origin(
        &self,
        origin: EventOrigin,
        events: &[CanonicalEvent],
    ) -> Result<ReplaceOutcome>;

    /// Insert one event. Fails on id collision.
    async fn insert_event(&self, event: &CanonicalEvent) -> Result<()>;

    /// Look up one event by id.
    async fn find_event(&self, id: &str) -> Result<Option<CanonicalEvent>>;

    /// Persist the full current state of an existing event.
    async fn update_event(&self, event: &CanonicalEvent) -> Result<()>;

    /// Delete one event by id.
    async fn delete_event(&self, id: &str) -> Result<()>;

    /// All events overlapping `[from, to]`, ordered by start time.
    async fn list_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CanonicalEvent>>;
}
