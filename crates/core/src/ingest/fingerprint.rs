//! Stable identity for externally sourced events
//!
//! Upstream systems do not hand out a durable primary key for every record,
//! so repeated syncs need a deterministic token to collapse the same logical
//! event onto the same stored row.

use plandesk_domain::RawExternalEvent;
use sha2::{Digest, Sha256};

/// Derive the stable fingerprint for one raw upstream event.
///
/// Preference order:
/// 1. A ticket/tracking key, used verbatim (ERP upgrade rows).
/// 2. The upstream event id, used verbatim (mail-calendar rows).
/// 3. A SHA-256 hex digest over `resolver|start|end` as delivered.
///
/// The hash input deliberately excludes volatile fields (titles, free-text
/// descriptions, fetch order); including them would defeat deduplication
/// across fetches. Total: every payload yields a token.
pub fn fingerprint(raw: &RawExternalEvent) -> String {
    if let Some(ticket) = nonempty(raw.ticket_ref.as_deref()) {
        return ticket.to_string();
    }
    if let Some(id) = nonempty(raw.external_id.as_deref()) {
        return id.to_string();
    }

    let resolver = raw.resolver.as_deref().unwrap_or_default();
    let start = raw.start.as_deref().unwrap_or_default();
    let end = raw.end.as_deref().unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(resolver.as_bytes());
    hasher.update(b"|");
    hasher.update(start.as_bytes());
    hasher.update(b"|");
    hasher.update(end.as_bytes());
    hex::encode(hasher.finalize())
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch_row() -> RawExternalEvent {
        RawExternalEvent {
            title: Some("DB patch".to_string()),
            resolver: Some("Jane".to_string()),
            start: Some("2026-01-01".to_string()),
            end: Some("2026-01-02".to_string()),
            ..RawExternalEvent::default()
        }
    }

    #[test]
    fn ticket_key_is_used_verbatim() {
        let raw = RawExternalEvent {
            ticket_ref: Some("ABC-1".to_string()),
            project_ref: Some("ABC".to_string()),
            ..RawExternalEvent::default()
        };
        assert_eq!(fingerprint(&raw), "ABC-1");
    }

    #[test]
    fn upstream_id_is_used_verbatim() {
        let raw = RawExternalEvent {
            external_id: Some("AAMkAD=".to_string()),
            ..RawExternalEvent::default()
        };
        assert_eq!(fingerprint(&raw), "AAMkAD=");
    }

    #[test]
    fn hash_is_stable_across_calls() {
        assert_eq!(fingerprint(&patch_row()), fingerprint(&patch_row()));
    }

    #[test]
    fn hash_changes_with_schedule() {
        let mut moved = patch_row();
        moved.end = Some("2026-01-03".to_string());
        assert_ne!(fingerprint(&patch_row()), fingerprint(&moved));
    }

    #[test]
    fn hash_ignores_volatile_fields() {
        let mut reworded = patch_row();
        reworded.title = Some("Database patch (rescheduled)".to_string());
        reworded.description = Some("new description".to_string());
        assert_eq!(fingerprint(&patch_row()), fingerprint(&reworded));
    }

    #[test]
    fn empty_payload_still_yields_token() {
        let token = fingerprint(&RawExternalEvent::default());
        assert_eq!(token.len(), 64);
    }

    #[test]
    fn blank_ticket_falls_through_to_hash() {
        let mut raw = patch_row();
        raw.ticket_ref = Some("   ".to_string());
        assert_eq!(fingerprint(&raw), fingerprint(&patch_row()));
    }
}
