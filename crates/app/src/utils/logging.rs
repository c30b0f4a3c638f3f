//! Logging setup and structured command logging

use std::time::Duration;

use plandesk_domain::PlanDeskError;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Filtering is controlled through `RUST_LOG`; defaults to `info` for our
/// crates and `warn` elsewhere.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,plandesk_app=info,plandesk_core=info,plandesk_infra=info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a logical identifier (e.g. `"sync::run"`); callers must not
/// forward sensitive values in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `PlanDeskError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &PlanDeskError) -> &'static str {
    match error {
        PlanDeskError::Database(_) => "database",
        PlanDeskError::Config(_) => "config",
        PlanDeskError::Network(_) => "network",
        PlanDeskError::Auth(_) => "auth",
        PlanDeskError::NotFound(_) => "not_found",
        PlanDeskError::InvalidInput(_) => "invalid_input",
        PlanDeskError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_labels_are_stable() {
        assert_eq!(error_label(&PlanDeskError::Auth("x".into())), "auth");
        assert_eq!(error_label(&PlanDeskError::NotFound("x".into())), "not_found");
        assert_eq!(error_label(&PlanDeskError::Network("x".into())), "network");
    }
}
