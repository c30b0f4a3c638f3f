//! Canonical event model and the raw upstream payload shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which system authored an event. Determines ownership and mutability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOrigin {
    Local,
    Erp,
    ExternalCalendar,
}

impl EventOrigin {
    /// Stable storage/wire token, also the prefix of derived event ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Erp => "ERP",
            Self::ExternalCalendar => "EXTERNAL_CALENDAR",
        }
    }

    /// Parse the storage token back into the enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOCAL" => Some(Self::Local),
            "ERP" => Some(Self::Erp),
            "EXTERNAL_CALENDAR" => Some(Self::ExternalCalendar),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain category of an event (closed set).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Meeting,
    Other,
    ErpUpgrade,
    ErpPatch,
    ErpHoliday,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meeting => "MEETING",
            Self::Other => "OTHER",
            Self::ErpUpgrade => "ERP_UPGRADE",
            Self::ErpPatch => "ERP_PATCH",
            Self::ErpHoliday => "ERP_HOLIDAY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MEETING" => Some(Self::Meeting),
            "OTHER" => Some(Self::Other),
            "ERP_UPGRADE" => Some(Self::ErpUpgrade),
            "ERP_PATCH" => Some(Self::ErpPatch),
            "ERP_HOLIDAY" => Some(Self::ErpHoliday),
            _ => None,
        }
    }

    /// Kind/origin legality table. Stores and mutation endpoints reject
    /// combinations outside this table instead of persisting them silently.
    pub fn allowed_for(&self, origin: EventOrigin) -> bool {
        match origin {
            EventOrigin::Local => matches!(self, Self::Meeting | Self::Other),
            EventOrigin::Erp => {
                matches!(self, Self::ErpUpgrade | Self::ErpPatch | Self::ErpHoliday | Self::Other)
            }
            EventOrigin::ExternalCalendar => matches!(self, Self::Meeting),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit stored and displayed.
///
/// Externally sourced events carry a deterministic id
/// `"<ORIGIN>-<fingerprint>"`; local events get a store-generated UUID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEvent {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub is_all_day: bool,
    pub kind: EventKind,
    pub origin: EventOrigin,
    /// Authoring user; present only for `LOCAL` origin. Reconciled events
    /// have no owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Value fed into identity derivation for externally sourced events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_project_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ticket_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_resolver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_systems_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_calendar_id: Option<String>,
}

/// One inbound event as fetched from an upstream system, before
/// classification and normalization.
///
/// Upstream systems provide no type discriminator; which optional fields are
/// populated is what the classifier inspects. Adapters map their wire
/// formats into this shape and nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawExternalEvent {
    /// Natural unique reference from the upstream system, when it has one
    /// (mail-calendar event id). Used verbatim as the fingerprint.
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Start timestamp as delivered upstream (RFC 3339 or bare date).
    pub start: Option<String>,
    /// End timestamp as delivered upstream; may be missing or inverted.
    pub end: Option<String>,
    pub is_all_day: Option<bool>,
    /// ERP project reference (upgrade rows only).
    pub project_ref: Option<String>,
    /// ERP ticket/tracking key (upgrade rows only).
    pub ticket_ref: Option<String>,
    /// Responsible party (ERP patch/holiday rows).
    pub resolver: Option<String>,
    /// Source calendar id (mail-calendar rows).
    pub calendar_id: Option<String>,
}

/// Outcome summary of one reconciliation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub created: usize,
    pub deleted: usize,
    /// Per-record soft failures; never aborts the run.
    pub errors: Vec<String>,
}

/// Input for creating a user-authored local event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalEventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub is_all_day: bool,
    pub kind: EventKind,
}

/// Field-wise update for an event; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub is_all_day: Option<bool>,
    pub kind: Option<EventKind>,
}
