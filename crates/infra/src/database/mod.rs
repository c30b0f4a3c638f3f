//! SQLite-backed event store

mod event_repository;
mod pool;

pub use event_repository::SqliteEventRepository;
pub use pool::EventStorePool;
