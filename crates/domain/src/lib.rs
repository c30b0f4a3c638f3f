//! # PlanDesk Domain
//!
//! Business domain types and models for PlanDesk.
//!
//! This crate contains:
//! - Domain data types (CanonicalEvent, SyncReport, actors, raw payloads)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (classification vocabulary, timeouts)
//!
//! ## Architecture
//! - No dependencies on other PlanDesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
