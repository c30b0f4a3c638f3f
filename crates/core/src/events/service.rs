//! Unified event view and policy-checked mutations

use std::sync::Arc;

use chrono::{DateTime, Utc};
use plandesk_domain::{
    Actor, CanonicalEvent, EventOrigin, EventPatch, LocalEventDraft, PlanDeskError, Result,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::policy::access_for;

use super::ports::EventRepository;

/// Read composition and mutation surface over the event store.
///
/// Every mutation consults the access policy freshly for the stored event;
/// a denial surfaces as an authorization error, distinct from "not found".
pub struct EventService {
    repository: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    /// All events overlapping the window that the actor may view, ordered
    /// by start time. Tolerates empty partitions (before any sync has run).
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn list_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        actor: &Actor,
    ) -> Result<Vec<CanonicalEvent>> {
        let events = self.repository.list_window(from, to).await?;
        Ok(events.into_iter().filter(|event| access_for(event, actor).view).collect())
    }

    /// Author a new local event owned by the actor.
    #[instrument(skip(self, actor, draft), fields(actor = %actor.id))]
    pub async fn create_local_event(
        &self,
        actor: &Actor,
        draft: LocalEventDraft,
    ) -> Result<CanonicalEvent> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(PlanDeskError::InvalidInput("event title must not be empty".to_string()));
        }
        if !draft.kind.allowed_for(EventOrigin::Local) {
            return Err(PlanDeskError::InvalidInput(format!(
                "kind {} cannot be authored locally",
                draft.kind
            )));
        }
        if draft.end_at < draft.start_at {
            return Err(PlanDeskError::InvalidInput("event end precedes start".to_string()));
        }

        let event = CanonicalEvent {
            id: Uuid::now_v7().to_string(),
            title: title.to_string(),
            description: draft.description.filter(|d| !d.trim().is_empty()),
            start_at: draft.start_at,
            end_at: draft.end_at,
            is_all_day: draft.is_all_day,
            kind: draft.kind,
            origin: EventOrigin::Local,
            owner_id: Some(actor.id.clone()),
            source_fingerprint: None,
            external_project_ref: None,
            external_ticket_ref: None,
            external_resolver: None,
            external_systems_note: None,
            external_calendar_id: None,
        };
        self.repository.insert_event(&event).await?;
        info!(event_id = %event.id, "local event created");
        Ok(event)
    }

    /// Apply a field-wise patch to an existing event.
    #[instrument(skip(self, actor, patch), fields(actor = %actor.id))]
    pub async fn update_event(
        &self,
        actor: &Actor,
        id: &str,
        patch: EventPatch,
    ) -> Result<CanonicalEvent> {
        let mut event = self.require_event(id).await?;
        if !access_for(&event, actor).edit {
            return Err(PlanDeskError::Auth(
                "insufficient permission to edit this event".to_string(),
            ));
        }

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(PlanDeskError::InvalidInput(
                    "event title must not be empty".to_string(),
                ));
            }
            event.title = title;
        }
        if patch.description.is_some() {
            event.description = patch.description.filter(|d| !d.trim().is_empty());
        }
        if let Some(start_at) = patch.start_at {
            event.start_at = start_at;
        }
        if let Some(end_at) = patch.end_at {
            event.end_at = end_at;
        }
        if let Some(is_all_day) = patch.is_all_day {
            event.is_all_day = is_all_day;
        }
        if let Some(kind) = patch.kind {
            if !kind.allowed_for(event.origin) {
                return Err(PlanDeskError::InvalidInput(format!(
                    "kind {} is not valid for origin {}",
                    kind, event.origin
                )));
            }
            event.kind = kind;
        }
        if event.end_at < event.start_at {
            return Err(PlanDeskError::InvalidInput("event end precedes start".to_string()));
        }

        self.repository.update_event(&event).await?;
        info!(event_id = %event.id, "event updated");
        Ok(event)
    }

    /// Delete an event after a policy check.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete_event(&self, actor: &Actor, id: &str) -> Result<()> {
        let event = self.require_event(id).await?;
        if !access_for(&event, actor).delete {
            return Err(PlanDeskError::Auth(
                "insufficient permission to delete this event".to_string(),
            ));
        }
        self.repository.delete_event(id).await?;
        info!(event_id = %id, "event deleted");
        Ok(())
    }

    async fn require_event(&self, id: &str) -> Result<CanonicalEvent> {
        self.repository
            .find_event(id)
            .await?
            .ok_or_else(|| PlanDeskError::NotFound(format!("event '{id}' not found")))
    }
}
