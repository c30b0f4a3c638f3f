//! Source adapter port interfaces

use async_trait::async_trait;
use plandesk_domain::{EventOrigin, RawExternalEvent, Result};

/// Result of one upstream fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The upstream system returned a snapshot of its current events.
    Available(Vec<RawExternalEvent>),
    /// The upstream system reports the feature as not implemented. Treated
    /// as an empty snapshot so stale local state is still cleared.
    NotImplemented,
}

/// One upstream system feeding a partition of the event store.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which partition this adapter feeds.
    fn origin(&self) -> EventOrigin;

    /// Fetch the current upstream snapshot.
    ///
    /// Transport failures (unreachable host, timeout, malformed body)
    /// surface as [`plandesk_domain::PlanDeskError::Network`] and abort the
    /// sync run before any stored state is touched.
    async fn fetch_events(&self) -> Result<FetchOutcome>;
}
