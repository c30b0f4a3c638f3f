//! Structural event classification
//!
//! Upstream payloads carry no type tag; the kind is decided by which fields
//! are present, tried in a fixed priority order with a catch-all at the end
//! so classification is total.

use plandesk_domain::constants::ABSENCE_TITLE_KEYWORDS;
use plandesk_domain::{EventKind, EventOrigin, RawExternalEvent};

/// Assign a domain kind to one raw upstream event.
///
/// ERP rows, in priority order:
/// 1. project reference + ticket reference -> [`EventKind::ErpUpgrade`]
/// 2. resolver, no project reference, title without an absence keyword ->
///    [`EventKind::ErpPatch`]
/// 3. resolver, no project reference, title with an absence keyword ->
///    [`EventKind::ErpHoliday`]
/// 4. anything else -> [`EventKind::Other`], never dropped
///
/// Every mail-calendar row is a [`EventKind::Meeting`].
pub fn classify(origin: EventOrigin, raw: &RawExternalEvent) -> EventKind {
    match origin {
        EventOrigin::ExternalCalendar => EventKind::Meeting,
        EventOrigin::Erp => classify_erp(raw),
        // Local events are authored with an explicit kind, not classified;
        // the fallback keeps this function total.
        EventOrigin::Local => EventKind::Other,
    }
}

fn classify_erp(raw: &RawExternalEvent) -> EventKind {
    let has_project = present(raw.project_ref.as_deref());
    let has_ticket = present(raw.ticket_ref.as_deref());
    let has_resolver = present(raw.resolver.as_deref());

    if has_project && has_ticket {
        return EventKind::ErpUpgrade;
    }
    if has_resolver && !has_project {
        if title_marks_absence(raw.title.as_deref()) {
            return EventKind::ErpHoliday;
        }
        return EventKind::ErpPatch;
    }
    EventKind::Other
}

fn present(value: Option<&str>) -> bool {
    value.map(str::trim).is_some_and(|v| !v.is_empty())
}

/// Case-insensitive substring match against the absence vocabulary.
///
/// Known precision limitation: a patch whose title happens to contain a
/// keyword classifies as a holiday. Kept as-is for compatibility with the
/// upstream data.
fn title_marks_absence(title: Option<&str>) -> bool {
    let Some(title) = title else {
        return false;
    };
    let lowered = title.to_lowercase();
    ABSENCE_TITLE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erp(raw: &RawExternalEvent) -> EventKind {
        classify(EventOrigin::Erp, raw)
    }

    #[test]
    fn project_and_ticket_classify_as_upgrade() {
        let raw = RawExternalEvent {
            title: Some("Upgrade wave 3".to_string()),
            project_ref: Some("ABC".to_string()),
            ticket_ref: Some("ABC-1".to_string()),
            resolver: Some("Jane".to_string()),
            ..RawExternalEvent::default()
        };
        assert_eq!(erp(&raw), EventKind::ErpUpgrade);
    }

    #[test]
    fn resolver_without_project_classifies_as_patch() {
        let raw = RawExternalEvent {
            title: Some("Security patch".to_string()),
            resolver: Some("Jane".to_string()),
            ..RawExternalEvent::default()
        };
        assert_eq!(erp(&raw), EventKind::ErpPatch);
    }

    #[test]
    fn absence_keyword_classifies_as_holiday() {
        for title in ["dovolená", "Dovolená", "Čerpání DOVOLENÉ"] {
            let raw = RawExternalEvent {
                title: Some(title.to_string()),
                resolver: Some("Jane".to_string()),
                ..RawExternalEvent::default()
            };
            assert_eq!(erp(&raw), EventKind::ErpHoliday, "title {title:?}");
        }
    }

    #[test]
    fn keyword_without_resolver_is_not_a_holiday() {
        let raw = RawExternalEvent {
            title: Some("dovolená".to_string()),
            ..RawExternalEvent::default()
        };
        assert_eq!(erp(&raw), EventKind::Other);
    }

    #[test]
    fn bare_payload_falls_back_to_other() {
        assert_eq!(erp(&RawExternalEvent::default()), EventKind::Other);

        let raw = RawExternalEvent {
            title: Some("Maintenance window".to_string()),
            project_ref: Some("ABC".to_string()),
            ..RawExternalEvent::default()
        };
        assert_eq!(erp(&raw), EventKind::Other, "project without ticket");
    }

    #[test]
    fn mail_calendar_rows_are_meetings() {
        let raw = RawExternalEvent::default();
        assert_eq!(classify(EventOrigin::ExternalCalendar, &raw), EventKind::Meeting);
    }
}
