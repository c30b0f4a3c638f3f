//! Reconciliation of synchronized origins

pub mod ports;
pub mod service;

pub use service::SyncService;
