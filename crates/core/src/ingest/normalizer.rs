//! Raw payload to canonical event mapping
//!
//! Normalization failures are per-record soft errors carried as plain
//! strings; the reconciler aggregates them into the run report instead of
//! aborting the batch.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use plandesk_domain::{CanonicalEvent, EventKind, EventOrigin, RawExternalEvent};

use super::{classify, fingerprint};

/// Map one raw upstream event into the canonical stored shape.
///
/// The id is derived as `"<ORIGIN>-<fingerprint>"`, so identical logical
/// events retrieved by later fetches land on the same row. A missing or
/// inverted end collapses to a zero-duration event at the start time
/// rather than failing the record.
pub fn normalize(
    origin: EventOrigin,
    raw: &RawExternalEvent,
) -> std::result::Result<CanonicalEvent, String> {
    let token = fingerprint(raw);

    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| format!("record '{token}': missing title"))?
        .to_string();

    let start_raw = raw
        .start
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("record '{token}': missing start timestamp"))?;
    let start_at = parse_timestamp(start_raw)
        .map_err(|e| format!("record '{token}': invalid start timestamp '{start_raw}': {e}"))?;

    let end_at = match raw.end.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(end_raw) => {
            let parsed = parse_timestamp(end_raw)
                .map_err(|e| format!("record '{token}': invalid end timestamp '{end_raw}': {e}"))?;
            // Inverted ranges collapse to the start instead of failing.
            if parsed < start_at {
                start_at
            } else {
                parsed
            }
        }
        None => start_at,
    };

    let kind = classify(origin, raw);
    // ERP rows are whole-day entries; the mail calendar says so explicitly.
    let is_all_day = match origin {
        EventOrigin::Erp => true,
        _ => raw.is_all_day.unwrap_or(false),
    };

    let mut event = CanonicalEvent {
        id: format!("{}-{}", origin.as_str(), token),
        title,
        description: trimmed(raw.description.as_deref()),
        start_at,
        end_at,
        is_all_day,
        kind,
        origin,
        owner_id: None,
        source_fingerprint: Some(token),
        external_project_ref: None,
        external_ticket_ref: None,
        external_resolver: None,
        external_systems_note: None,
        external_calendar_id: None,
    };

    match kind {
        EventKind::ErpUpgrade => {
            event.external_project_ref = trimmed(raw.project_ref.as_deref());
            event.external_ticket_ref = trimmed(raw.ticket_ref.as_deref());
            event.external_resolver = trimmed(raw.resolver.as_deref());
        }
        EventKind::ErpPatch => {
            event.external_resolver = trimmed(raw.resolver.as_deref());
            // Patch rows use the description as the affected-systems note.
            event.external_systems_note = trimmed(raw.description.as_deref());
        }
        EventKind::ErpHoliday => {
            event.external_resolver = trimmed(raw.resolver.as_deref());
        }
        EventKind::Meeting => {
            event.external_calendar_id = trimmed(raw.calendar_id.as_deref());
        }
        EventKind::Other => {
            event.external_resolver = trimmed(raw.resolver.as_deref());
        }
    }

    Ok(event)
}

/// Parse an upstream timestamp.
///
/// Accepts a bare `YYYY-MM-DD` date (taken as UTC midnight) or an RFC 3339
/// datetime; a datetime without an explicit offset is taken as UTC.
fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if !value.contains('T') {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| e.to_string())?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| "invalid date".to_string())?;
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    let has_explicit_offset = value.ends_with('Z')
        || value
            .rfind('T')
            .is_some_and(|idx| value[idx + 1..].chars().any(|c| matches!(c, '+' | '-')));
    let candidate = if has_explicit_offset { value.to_string() } else { format!("{value}Z") };

    DateTime::parse_from_rfc3339(&candidate)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgrade_row() -> RawExternalEvent {
        RawExternalEvent {
            title: Some("Upgrade wave 3".to_string()),
            description: Some("Core modules".to_string()),
            start: Some("2026-01-05".to_string()),
            end: Some("2026-01-07".to_string()),
            project_ref: Some("ABC".to_string()),
            ticket_ref: Some("ABC-1".to_string()),
            resolver: Some("Jane".to_string()),
            ..RawExternalEvent::default()
        }
    }

    #[test]
    fn upgrade_row_normalizes_with_verbatim_ticket_id() {
        let event = normalize(EventOrigin::Erp, &upgrade_row()).unwrap();
        assert_eq!(event.id, "ERP-ABC-1");
        assert_eq!(event.kind, EventKind::ErpUpgrade);
        assert_eq!(event.origin, EventOrigin::Erp);
        assert_eq!(event.source_fingerprint.as_deref(), Some("ABC-1"));
        assert_eq!(event.external_project_ref.as_deref(), Some("ABC"));
        assert_eq!(event.external_ticket_ref.as_deref(), Some("ABC-1"));
        assert_eq!(event.external_resolver.as_deref(), Some("Jane"));
        assert!(event.is_all_day, "ERP rows are whole-day entries");
        assert!(event.owner_id.is_none(), "reconciled events have no owner");
    }

    #[test]
    fn patch_row_copies_description_into_systems_note() {
        let raw = RawExternalEvent {
            title: Some("Security patch".to_string()),
            description: Some("billing, reporting".to_string()),
            start: Some("2026-01-01".to_string()),
            end: Some("2026-01-02".to_string()),
            resolver: Some("Jane".to_string()),
            ..RawExternalEvent::default()
        };
        let event = normalize(EventOrigin::Erp, &raw).unwrap();
        assert_eq!(event.kind, EventKind::ErpPatch);
        assert_eq!(event.external_systems_note.as_deref(), Some("billing, reporting"));
        assert_eq!(event.id, format!("ERP-{}", fingerprint(&raw)));
    }

    #[test]
    fn bare_dates_become_utc_midnight() {
        let event = normalize(EventOrigin::Erp, &upgrade_row()).unwrap();
        assert_eq!(event.start_at.to_rfc3339(), "2026-01-05T00:00:00+00:00");
        assert_eq!(event.end_at.to_rfc3339(), "2026-01-07T00:00:00+00:00");
    }

    #[test]
    fn missing_end_collapses_to_start() {
        let mut raw = upgrade_row();
        raw.end = None;
        let event = normalize(EventOrigin::Erp, &raw).unwrap();
        assert_eq!(event.start_at, event.end_at);
    }

    #[test]
    fn inverted_end_collapses_to_start() {
        let mut raw = upgrade_row();
        raw.end = Some("2025-12-31".to_string());
        let event = normalize(EventOrigin::Erp, &raw).unwrap();
        assert_eq!(event.start_at, event.end_at);
    }

    #[test]
    fn unparsable_start_fails_the_record() {
        let mut raw = upgrade_row();
        raw.start = Some("next tuesday".to_string());
        let err = normalize(EventOrigin::Erp, &raw).unwrap_err();
        assert!(err.contains("invalid start timestamp"), "{err}");
        assert!(err.contains("ABC-1"), "error names the record: {err}");
    }

    #[test]
    fn missing_title_fails_the_record() {
        let mut raw = upgrade_row();
        raw.title = Some("   ".to_string());
        let err = normalize(EventOrigin::Erp, &raw).unwrap_err();
        assert!(err.contains("missing title"), "{err}");
    }

    #[test]
    fn mail_row_normalizes_as_meeting() {
        let raw = RawExternalEvent {
            external_id: Some("AAMkAD=".to_string()),
            title: Some("Weekly standup".to_string()),
            description: Some("Agenda".to_string()),
            start: Some("2026-01-05T09:00:00.0000000".to_string()),
            end: Some("2026-01-05T09:30:00.0000000".to_string()),
            is_all_day: Some(false),
            calendar_id: Some("primary".to_string()),
            ..RawExternalEvent::default()
        };
        let event = normalize(EventOrigin::ExternalCalendar, &raw).unwrap();
        assert_eq!(event.id, "EXTERNAL_CALENDAR-AAMkAD=");
        assert_eq!(event.kind, EventKind::Meeting);
        assert!(!event.is_all_day);
        assert_eq!(event.external_calendar_id.as_deref(), Some("primary"));
        assert_eq!(event.start_at.to_rfc3339(), "2026-01-05T09:00:00+00:00");
    }

    #[test]
    fn explicit_offset_is_respected() {
        let raw = RawExternalEvent {
            external_id: Some("x".to_string()),
            title: Some("Review".to_string()),
            start: Some("2026-01-05T10:00:00+02:00".to_string()),
            end: Some("2026-01-05T11:00:00+02:00".to_string()),
            ..RawExternalEvent::default()
        };
        let event = normalize(EventOrigin::ExternalCalendar, &raw).unwrap();
        assert_eq!(event.start_at.to_rfc3339(), "2026-01-05T08:00:00+00:00");
    }
}
