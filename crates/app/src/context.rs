//! Application context - dependency injection container

use std::sync::Arc;

use plandesk_core::events::ports::EventRepository;
use plandesk_core::{EventService, SyncService};
use plandesk_domain::{PlanDeskConfig, Result};
use plandesk_infra::{
    ErpCalendarAdapter, EventStorePool, MailCalendarAdapter, SqliteEventRepository,
    StaticTokenProvider,
};

/// Environment variable carrying the mail-calendar bearer token, issued by
/// the external identity provider.
pub const MAIL_TOKEN_ENV: &str = "PLANDESK_MAIL_TOKEN";

/// Fully wired services shared by every command.
pub struct AppContext {
    pub config: PlanDeskConfig,
    pub events: EventService,
    pub sync: SyncService,
}

impl AppContext {
    /// Wire the context from the ambient configuration (environment, then
    /// probed config files).
    pub fn new() -> Result<Self> {
        let config = plandesk_infra::config::load()?;
        Self::with_config(config)
    }

    /// Wire the context from an explicit configuration.
    pub fn with_config(config: PlanDeskConfig) -> Result<Self> {
        let pool = Arc::new(EventStorePool::new(&config.database)?);
        let repository: Arc<dyn EventRepository> = Arc::new(SqliteEventRepository::new(pool));

        let erp_adapter = Arc::new(ErpCalendarAdapter::new(&config.erp)?);
        let token_provider =
            Arc::new(StaticTokenProvider::new(std::env::var(MAIL_TOKEN_ENV).ok()));
        let mail_adapter = Arc::new(MailCalendarAdapter::new(&config.mail, token_provider)?);

        let sync = SyncService::new(repository.clone())
            .with_adapter(erp_adapter)
            .with_adapter(mail_adapter);
        let events = EventService::new(repository);

        Ok(Self { config, events, sync })
    }
}
