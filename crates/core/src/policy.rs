//! Access policy
//!
//! Pure decision table from `(event origin, actor)` to view/edit/delete
//! rights. Consumed by the presentation layer and by every mutation
//! endpoint; callers query it fresh on each attempt instead of caching the
//! decision.

use plandesk_domain::{Actor, ActorRole, CanonicalEvent, EventOrigin};
use serde::{Deserialize, Serialize};

/// Roles allowed to edit ERP-sourced events.
pub const ERP_EDIT_ROLES: &[ActorRole] = &[ActorRole::Admin, ActorRole::It, ActorRole::Manager];

/// Roles allowed to delete ERP-sourced events. Stricter tier, a subset of
/// [`ERP_EDIT_ROLES`].
pub const ERP_DELETE_ROLES: &[ActorRole] = &[ActorRole::Admin, ActorRole::It];

/// Roles allowed to trigger a reconciliation run.
pub const SYNC_TRIGGER_ROLES: &[ActorRole] = &[ActorRole::Admin, ActorRole::It];

/// What one actor may do with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

/// Decide the actor's rights over one event.
///
/// Viewing is always permitted for an authenticated actor. Local events are
/// mutable by their owner only; ERP events by the privileged role tiers;
/// mail-calendar events are read-only here, mutation happens in the
/// upstream system.
pub fn access_for(event: &CanonicalEvent, actor: &Actor) -> AccessDecision {
    match event.origin {
        EventOrigin::Local => {
            let owns = event.owner_id.as_deref() == Some(actor.id.as_str());
            AccessDecision { view: true, edit: owns, delete: owns }
        }
        EventOrigin::Erp => AccessDecision {
            view: true,
            edit: ERP_EDIT_ROLES.contains(&actor.role),
            delete: ERP_DELETE_ROLES.contains(&actor.role),
        },
        EventOrigin::ExternalCalendar => {
            AccessDecision { view: true, edit: false, delete: false }
        }
    }
}

/// Whether the role may start a sync run.
pub fn can_trigger_sync(role: ActorRole) -> bool {
    SYNC_TRIGGER_ROLES.contains(&role)
}
