//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for PlanDesk
///
/// Fetch-layer failures surface as `Network` and abort a sync run before any
/// stored state is touched. Policy denials surface as `Auth` and are distinct
/// from `NotFound` so callers can tell "forbidden" from "gone". Per-record
/// normalization failures are NOT represented here; they travel as plain
/// strings inside [`crate::SyncReport::errors`].
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PlanDeskError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PlanDesk operations
pub type Result<T> = std::result::Result<T, PlanDeskError>;
