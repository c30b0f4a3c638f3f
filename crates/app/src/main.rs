//! PlanDesk - calendar synchronization host
//!
//! Thin operator CLI over the command surface. Session handling lives in
//! the surrounding portal; the acting identity is taken from the
//! environment here.

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use plandesk_app::commands::{events, sync};
use plandesk_app::utils::logging::init_tracing;
use plandesk_app::AppContext;
use plandesk_domain::{Actor, ActorRole, EventOrigin};

fn actor_from_env() -> anyhow::Result<Actor> {
    let id = std::env::var("PLANDESK_ACTOR_ID").unwrap_or_else(|_| "operator".to_string());
    let role_token =
        std::env::var("PLANDESK_ACTOR_ROLE").unwrap_or_else(|_| "ADMIN".to_string());
    let role = ActorRole::parse(&role_token)
        .with_context(|| format!("unknown actor role '{role_token}'"))?;
    Ok(Actor::new(id, role))
}

fn parse_bound(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid time bound '{value}', expected RFC 3339 or YYYY-MM-DD"))?;
    let midnight =
        date.and_hms_opt(0, 0, 0).context("invalid time bound")?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn usage() -> &'static str {
    "usage:\n  plandesk sync <erp|mail|all>\n  plandesk list <from> <to>"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ctx = AppContext::new().context("failed to initialize application context")?;
    let actor = actor_from_env()?;

    match args.first().map(String::as_str) {
        Some("sync") => {
            let target = args.get(1).map(String::as_str).unwrap_or("all");
            match target {
                "erp" => {
                    let report = sync::run_sync(&ctx, &actor, EventOrigin::Erp).await?;
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "mail" => {
                    let report =
                        sync::run_sync(&ctx, &actor, EventOrigin::ExternalCalendar).await?;
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "all" => {
                    for (origin, outcome) in sync::run_sync_all(&ctx, &actor).await {
                        match outcome {
                            Ok(report) => println!(
                                "{origin}: {}",
                                serde_json::to_string(&report)?
                            ),
                            Err(e) => eprintln!("{origin}: sync failed: {e}"),
                        }
                    }
                }
                other => bail!("unknown sync target '{other}'\n{}", usage()),
            }
        }
        Some("list") => {
            let (Some(from), Some(to)) = (args.get(1), args.get(2)) else {
                bail!("{}", usage());
            };
            let window =
                events::list_events(&ctx, &actor, parse_bound(from)?, parse_bound(to)?).await?;
            println!("{}", serde_json::to_string_pretty(&window)?);
        }
        _ => bail!("{}", usage()),
    }

    Ok(())
}
