//! Synchronization trigger commands

use std::time::Instant;

use plandesk_core::policy::can_trigger_sync;
use plandesk_domain::{Actor, EventOrigin, PlanDeskError, Result, SyncReport};
use tracing::info;

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Run one reconciliation for `origin` on behalf of `actor`.
///
/// The trigger itself is role-gated; the policy check happens here so a
/// scheduler bypassing the display layer still cannot widen access.
pub async fn run_sync(ctx: &AppContext, actor: &Actor, origin: EventOrigin) -> Result<SyncReport> {
    let command_name = "sync::run";
    let start = Instant::now();

    if !can_trigger_sync(actor.role) {
        log_command_execution(command_name, start.elapsed(), false);
        return Err(PlanDeskError::Auth(
            "insufficient permission to trigger synchronization".to_string(),
        ));
    }

    info!(command = command_name, origin = %origin, actor = %actor.id, "starting sync run");
    let result = ctx.sync.sync(origin).await;
    let elapsed = start.elapsed();

    match &result {
        Ok(report) => {
            info!(
                command = command_name,
                origin = %origin,
                created = report.created,
                deleted = report.deleted,
                error_count = report.errors.len(),
                "sync run completed"
            );
            log_command_execution(command_name, elapsed, true);
        }
        Err(e) => {
            info!(command = command_name, origin = %origin, error = error_label(e), "sync run failed");
            log_command_execution(command_name, elapsed, false);
        }
    }

    result
}

/// Run reconciliation for every registered origin, in sequence.
///
/// Origins are independent; one failed origin does not stop the others.
pub async fn run_sync_all(
    ctx: &AppContext,
    actor: &Actor,
) -> Vec<(EventOrigin, Result<SyncReport>)> {
    let mut origins = ctx.sync.origins();
    origins.sort_by_key(|o| o.as_str());

    let mut outcomes = Vec::with_capacity(origins.len());
    for origin in origins {
        let outcome = run_sync(ctx, actor, origin).await;
        outcomes.push((origin, outcome));
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use plandesk_domain::{
        ActorRole, DatabaseConfig, ErpConfig, MailConfig, PlanDeskConfig,
    };
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(dir: &tempfile::TempDir, erp_base: &str) -> PlanDeskConfig {
        PlanDeskConfig {
            database: DatabaseConfig {
                path: dir.path().join("events.db").to_string_lossy().into_owned(),
                pool_size: 2,
            },
            erp: ErpConfig { base_url: erp_base.to_string(), timeout_secs: 2 },
            mail: MailConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                lookback_hours: 24,
                lookahead_hours: 48,
                timeout_secs: 2,
            },
        }
    }

    #[tokio::test]
    async fn sync_trigger_is_role_gated() {
        let dir = tempfile::tempdir().unwrap();
        // No upstream needed: the gate fires before any fetch.
        let ctx = AppContext::with_config(config(&dir, "http://127.0.0.1:9")).unwrap();

        for role in [ActorRole::Manager, ActorRole::User, ActorRole::Viewer] {
            let actor = Actor::new("u", role);
            let err = run_sync(&ctx, &actor, EventOrigin::Erp).await.unwrap_err();
            assert!(matches!(err, PlanDeskError::Auth(_)), "{role:?}");
        }
    }

    #[tokio::test]
    async fn privileged_sync_runs_and_reports() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "nazev": "Patch", "datum_od": "2026-01-01", "datum_do": "2026-01-02", "resitel": "Jane" }
            ])))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::with_config(config(&dir, &server.uri())).unwrap();

        let admin = Actor::new("a", ActorRole::Admin);
        let report = run_sync(&ctx, &admin, EventOrigin::Erp).await.unwrap();
        assert_eq!(report.created, 1);
        assert!(report.errors.is_empty());
    }
}
