//! Event view and mutation commands

use std::time::Instant;

use chrono::{DateTime, Utc};
use plandesk_domain::{Actor, CanonicalEvent, EventPatch, LocalEventDraft, Result};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Unified event view over a time window.
pub async fn list_events(
    ctx: &AppContext,
    actor: &Actor,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<CanonicalEvent>> {
    let start = Instant::now();
    let result = ctx.events.list_window(from, to, actor).await;
    log_command_execution("events::list", start.elapsed(), result.is_ok());
    result
}

/// Author a new local event owned by the actor.
pub async fn create_event(
    ctx: &AppContext,
    actor: &Actor,
    draft: LocalEventDraft,
) -> Result<CanonicalEvent> {
    let start = Instant::now();
    let result = ctx.events.create_local_event(actor, draft).await;
    log_command_execution("events::create", start.elapsed(), result.is_ok());
    result
}

/// Patch an existing event, subject to the access policy.
pub async fn update_event(
    ctx: &AppContext,
    actor: &Actor,
    id: &str,
    patch: EventPatch,
) -> Result<CanonicalEvent> {
    let start = Instant::now();
    let result = ctx.events.update_event(actor, id, patch).await;
    log_command_execution("events::update", start.elapsed(), result.is_ok());
    result
}

/// Delete an event, subject to the access policy.
pub async fn delete_event(ctx: &AppContext, actor: &Actor, id: &str) -> Result<()> {
    let start = Instant::now();
    let result = ctx.events.delete_event(actor, id).await;
    log_command_execution("events::delete", start.elapsed(), result.is_ok());
    result
}
