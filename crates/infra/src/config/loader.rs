//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PLANDESK_DB_PATH`: event store file path (required)
//! - `PLANDESK_DB_POOL_SIZE`: connection pool size
//! - `PLANDESK_ERP_BASE_URL`: ERP web API base URL (required)
//! - `PLANDESK_ERP_TIMEOUT_SECS`: ERP fetch timeout
//! - `PLANDESK_MAIL_BASE_URL`: mail-calendar API base URL (required)
//! - `PLANDESK_MAIL_LOOKBACK_HOURS` / `PLANDESK_MAIL_LOOKAHEAD_HOURS`:
//!   fetch window bounds
//! - `PLANDESK_MAIL_TIMEOUT_SECS`: mail-calendar fetch timeout
//!
//! ## File Locations
//! The loader probes `config.{toml,json}` and `plandesk.{toml,json}` in the
//! working directory, then next to the executable.

use std::path::{Path, PathBuf};

use plandesk_domain::constants::{
    DEFAULT_DB_POOL_SIZE, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAIL_LOOKAHEAD_HOURS,
    DEFAULT_MAIL_LOOKBACK_HOURS,
};
use plandesk_domain::{
    DatabaseConfig, ErpConfig, MailConfig, PlanDeskConfig, PlanDeskError, Result,
};

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `PlanDeskError::Config` if neither the environment nor any
/// probed config file yields a complete configuration.
pub fn load() -> Result<PlanDeskConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment configuration incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `PLANDESK_*` environment variables.
///
/// # Errors
/// Returns `PlanDeskError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<PlanDeskConfig> {
    let database = DatabaseConfig {
        path: env_var("PLANDESK_DB_PATH")?,
        pool_size: env_parse("PLANDESK_DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?,
    };
    let erp = ErpConfig {
        base_url: env_var("PLANDESK_ERP_BASE_URL")?,
        timeout_secs: env_parse("PLANDESK_ERP_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?,
    };
    let mail = MailConfig {
        base_url: env_var("PLANDESK_MAIL_BASE_URL")?,
        lookback_hours: env_parse("PLANDESK_MAIL_LOOKBACK_HOURS", DEFAULT_MAIL_LOOKBACK_HOURS)?,
        lookahead_hours: env_parse("PLANDESK_MAIL_LOOKAHEAD_HOURS", DEFAULT_MAIL_LOOKAHEAD_HOURS)?,
        timeout_secs: env_parse("PLANDESK_MAIL_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?,
    };

    Ok(PlanDeskConfig { database, erp, mail })
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by extension (`.toml` or `.json`).
pub fn load_from_file(path: Option<PathBuf>) -> Result<PlanDeskConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PlanDeskError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PlanDeskError::Config(
                "no config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PlanDeskError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<PlanDeskConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PlanDeskError::Config(format!("invalid TOML config: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PlanDeskError::Config(format!("invalid JSON config: {e}"))),
        _ => Err(PlanDeskError::Config(format!("unsupported config format: {extension}"))),
    }
}

fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for name in ["config.toml", "config.json", "plandesk.toml", "plandesk.json"] {
            candidates.push(cwd.join(name));
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            for name in ["config.toml", "config.json", "plandesk.toml", "plandesk.json"] {
                candidates.push(exe_dir.join(name));
            }
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        PlanDeskError::Config(format!("missing required environment variable: {key}"))
    })
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| PlanDeskError::Config(format!("invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
