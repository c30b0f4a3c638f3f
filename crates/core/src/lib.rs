//! # PlanDesk Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Ingest pipeline (fingerprinting, classification, normalization)
//! - Port/adapter interfaces (traits)
//! - Reconciliation and event services
//! - Access policy
//!
//! ## Architecture Principles
//! - Only depends on `plandesk-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod events;
pub mod ingest;
pub mod policy;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use events::ports::{EventRepository, ReplaceOutcome};
pub use events::EventService;
pub use ingest::{classify, fingerprint, normalize};
pub use policy::{access_for, can_trigger_sync, AccessDecision};
pub use sync::ports::{FetchOutcome, SourceAdapter};
pub use sync::SyncService;
