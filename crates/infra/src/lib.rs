//! # PlanDesk Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite-backed event store
//! - HTTP client with retry and timeout support
//! - Upstream integrations (ERP planning calendar, mail calendar)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `plandesk-core`
//! - Depends on `plandesk-domain` and `plandesk-core`
//! - Contains all "impure" code (I/O, HTTP, storage)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::{EventStorePool, SqliteEventRepository};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::erp::ErpCalendarAdapter;
pub use integrations::mail::{AccessTokenProvider, MailCalendarAdapter, StaticTokenProvider};
