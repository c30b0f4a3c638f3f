//! Application configuration structures
//!
//! Deserialized from TOML/JSON config files or assembled from environment
//! variables by the infra config loader.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_POOL_SIZE, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAIL_LOOKAHEAD_HOURS,
    DEFAULT_MAIL_LOOKBACK_HOURS,
};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDeskConfig {
    pub database: DatabaseConfig,
    pub erp: ErpConfig,
    pub mail: MailConfig,
}

/// Local event store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// ERP planning-calendar upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpConfig {
    /// Base URL of the ERP web API (the adapter appends `/calendar`)
    pub base_url: String,
    /// Fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

/// External mail-calendar upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Base URL of the mail-calendar API
    pub base_url: String,
    /// How far back the fetch window reaches
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// How far ahead the fetch window reaches
    #[serde(default = "default_lookahead_hours")]
    pub lookahead_hours: u32,
    /// Fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_lookback_hours() -> u32 {
    DEFAULT_MAIL_LOOKBACK_HOURS
}

fn default_lookahead_hours() -> u32 {
    DEFAULT_MAIL_LOOKAHEAD_HOURS
}
