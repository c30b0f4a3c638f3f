//! Connection pool and schema management for the event store

use plandesk_domain::{DatabaseConfig, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::errors::InfraError;

/// Idempotent schema, applied on startup. `(origin, source_fingerprint)` is
/// uniquely constrained whenever a fingerprint is present, so a sync bug can
/// never store the same logical external event twice.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS events (
    id                   TEXT PRIMARY KEY,
    title                TEXT NOT NULL,
    description          TEXT,
    start_ts             INTEGER NOT NULL,
    end_ts               INTEGER NOT NULL,
    is_all_day           INTEGER NOT NULL,
    kind                 TEXT NOT NULL,
    origin               TEXT NOT NULL,
    owner_id             TEXT,
    source_fingerprint   TEXT,
    external_project_ref TEXT,
    external_ticket_ref  TEXT,
    external_resolver    TEXT,
    external_systems_note TEXT,
    external_calendar_id TEXT,
    created_at           INTEGER NOT NULL,
    updated_at           INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_events_origin_fingerprint
    ON events(origin, source_fingerprint)
    WHERE source_fingerprint IS NOT NULL;

CREATE INDEX IF NOT EXISTS idx_events_origin ON events(origin);
CREATE INDEX IF NOT EXISTS idx_events_window ON events(start_ts, end_ts);
";

/// r2d2-backed SQLite pool for the event store.
pub struct EventStorePool {
    pool: Pool<SqliteConnectionManager>,
}

impl EventStorePool {
    /// Open (creating if needed) the database at the configured path and
    /// apply the schema.
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let manager = SqliteConnectionManager::file(&config.path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
        });

        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .build(manager)
            .map_err(|e| InfraError::from(e).0)?;

        let store = Self { pool };
        store.apply_schema()?;
        info!(path = %config.path, pool_size = config.pool_size, "event store opened");
        Ok(store)
    }

    /// Borrow a pooled connection.
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| InfraError::from(e).0)
    }

    fn apply_schema(&self) -> Result<()> {
        let conn = self.get()?;
        conn.execute_batch(SCHEMA).map_err(|e| InfraError::from(e).0)
    }
}
