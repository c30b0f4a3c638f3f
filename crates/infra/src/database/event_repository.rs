//! SQLite implementation of the EventRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use plandesk_core::events::ports::{EventRepository, ReplaceOutcome};
use plandesk_domain::{CanonicalEvent, EventKind, EventOrigin, PlanDeskError, Result};
use rusqlite::{params, Row};
use tracing::{debug, instrument};

use crate::errors::InfraError;

use super::EventStorePool;

const SELECT_COLUMNS: &str = "id, title, description, start_ts, end_ts, is_all_day, kind, origin,
    owner_id, source_fingerprint, external_project_ref, external_ticket_ref,
    external_resolver, external_systems_note, external_calendar_id";

/// SQLite implementation of the event store port.
pub struct SqliteEventRepository {
    pool: Arc<EventStorePool>,
}

impl SqliteEventRepository {
    pub fn new(pool: Arc<EventStorePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    #[instrument(skip(self, events), fields(origin = %origin, batch = events.len()))]
    async fn replace_origin(
        &self,
        origin: EventOrigin,
        events: &[CanonicalEvent],
    ) -> Result<ReplaceOutcome> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().map_err(|e| InfraError::from(e).0)?;

        let deleted = tx
            .execute("DELETE FROM events WHERE origin = ?1", [origin.as_str()])
            .map_err(|e| InfraError::from(e).0)?;

        for event in events {
            insert_into(&tx, event)?;
        }

        tx.commit().map_err(|e| InfraError::from(e).0)?;
        debug!(deleted, created = events.len(), "partition replaced");
        Ok(ReplaceOutcome { deleted, created: events.len() })
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn insert_event(&self, event: &CanonicalEvent) -> Result<()> {
        let conn = self.pool.get()?;
        insert_into(&conn, event)
    }

    #[instrument(skip(self))]
    async fn find_event(&self, id: &str) -> Result<Option<CanonicalEvent>> {
        let conn = self.pool.get()?;
        let query = format!("SELECT {SELECT_COLUMNS} FROM events WHERE id = ?1");
        let row = conn.query_row(&query, [id], decode_row);

        match row {
            Ok(row) => Ok(Some(row.into_event()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).0),
        }
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update_event(&self, event: &CanonicalEvent) -> Result<()> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute(
                "UPDATE events SET
                    title = ?2, description = ?3, start_ts = ?4, end_ts = ?5,
                    is_all_day = ?6, kind = ?7, external_resolver = ?8,
                    external_systems_note = ?9, updated_at = ?10
                 WHERE id = ?1",
                params![
                    event.id,
                    event.title,
                    event.description,
                    event.start_at.timestamp(),
                    event.end_at.timestamp(),
                    event.is_all_day,
                    event.kind.as_str(),
                    event.external_resolver,
                    event.external_systems_note,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(|e| InfraError::from(e).0)?;

        if affected == 0 {
            return Err(PlanDeskError::NotFound(format!("event '{}' not found", event.id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, id: &str) -> Result<()> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute("DELETE FROM events WHERE id = ?1", [id])
            .map_err(|e| InfraError::from(e).0)?;

        if affected == 0 {
            return Err(PlanDeskError::NotFound(format!("event '{id}' not found")));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CanonicalEvent>> {
        let conn = self.pool.get()?;
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM events
             WHERE start_ts <= ?1 AND end_ts >= ?2
             ORDER BY start_ts ASC, id ASC"
        );

        let mut stmt = conn.prepare(&query).map_err(|e| InfraError::from(e).0)?;
        let rows = stmt
            .query_map(params![to.timestamp(), from.timestamp()], decode_row)
            .map_err(|e| InfraError::from(e).0)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row.map_err(|e| InfraError::from(e).0)?.into_event()?);
        }
        Ok(events)
    }
}

fn insert_into(conn: &rusqlite::Connection, event: &CanonicalEvent) -> Result<()> {
    if !event.kind.allowed_for(event.origin) {
        return Err(PlanDeskError::InvalidInput(format!(
            "kind '{}' is not valid for origin '{}'",
            event.kind, event.origin
        )));
    }
    let now = Utc::now().timestamp();
    conn.execute(
        "INSERT INTO events (
            id, title, description, start_ts, end_ts, is_all_day, kind, origin,
            owner_id, source_fingerprint, external_project_ref, external_ticket_ref,
            external_resolver, external_systems_note, external_calendar_id,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16)",
        params![
            event.id,
            event.title,
            event.description,
            event.start_at.timestamp(),
            event.end_at.timestamp(),
            event.is_all_day,
            event.kind.as_str(),
            event.origin.as_str(),
            event.owner_id,
            event.source_fingerprint,
            event.external_project_ref,
            event.external_ticket_ref,
            event.external_resolver,
            event.external_systems_note,
            event.external_calendar_id,
            now,
        ],
    )
    .map_err(|e| InfraError::from(e).0)?;
    Ok(())
}

/// Raw column values; enum tokens and timestamps are validated in
/// [`EventRow::into_event`] so decode failures surface as domain errors.
struct EventRow {
    id: String,
    title: String,
    description: Option<String>,
    start_ts: i64,
    end_ts: i64,
    is_all_day: bool,
    kind: String,
    origin: String,
    owner_id: Option<String>,
    source_fingerprint: Option<String>,
    external_project_ref: Option<String>,
    external_ticket_ref: Option<String>,
    external_resolver: Option<String>,
    external_systems_note: Option<String>,
    external_calendar_id: Option<String>,
}

fn decode_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_ts: row.get(3)?,
        end_ts: row.get(4)?,
        is_all_day: row.get(5)?,
        kind: row.get(6)?,
        origin: row.get(7)?,
        owner_id: row.get(8)?,
        source_fingerprint: row.get(9)?,
        external_project_ref: row.get(10)?,
        external_ticket_ref: row.get(11)?,
        external_resolver: row.get(12)?,
        external_systems_note: row.get(13)?,
        external_calendar_id: row.get(14)?,
    })
}

impl EventRow {
    fn into_event(self) -> Result<CanonicalEvent> {
        let kind = EventKind::parse(&self.kind).ok_or_else(|| {
            PlanDeskError::Database(format!("unknown kind token '{}' in store", self.kind))
        })?;
        let origin = EventOrigin::parse(&self.origin).ok_or_else(|| {
            PlanDeskError::Database(format!("unknown origin token '{}' in store", self.origin))
        })?;
        let start_at = to_datetime(self.start_ts)?;
        let end_at = to_datetime(self.end_ts)?;

        Ok(CanonicalEvent {
            id: self.id,
            title: self.title,
            description: self.description,
            start_at,
            end_at,
            is_all_day: self.is_all_day,
            kind,
            origin,
            owner_id: self.owner_id,
            source_fingerprint: self.source_fingerprint,
            external_project_ref: self.external_project_ref,
            external_ticket_ref: self.external_ticket_ref,
            external_resolver: self.external_resolver,
            external_systems_note: self.external_systems_note,
            external_calendar_id: self.external_calendar_id,
        })
    }
}

fn to_datetime(ts: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| PlanDeskError::Database(format!("timestamp {ts} out of range")))
}
