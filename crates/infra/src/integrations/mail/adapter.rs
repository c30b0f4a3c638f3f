//! HTTP adapter for the external mail calendar.
//!
//! Talks to a Graph-style events API: bearer-authenticated `GET
//! <base>/me/events` over a bounded scheduling window, response wrapped in
//! a `{"value": [...]}` envelope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use plandesk_core::sync::ports::{FetchOutcome, SourceAdapter};
use plandesk_domain::{EventOrigin, MailConfig, PlanDeskError, RawExternalEvent, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::http::HttpClient;

use super::AccessTokenProvider;

const EVENT_FIELDS: &str = "id,subject,bodyPreview,start,end,isAllDay,calendarId";
const PAGE_SIZE: &str = "999";

/// Fetches meeting rows from the mail-calendar API.
pub struct MailCalendarAdapter {
    http: HttpClient,
    base_url: Url,
    tokens: Arc<dyn AccessTokenProvider>,
    lookback_hours: u32,
    lookahead_hours: u32,
}

impl MailCalendarAdapter {
    pub fn new(config: &MailConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("plandesk")
            .build()?;
        Self::with_http(config, tokens, http)
    }

    pub fn with_http(
        config: &MailConfig,
        tokens: Arc<dyn AccessTokenProvider>,
        http: HttpClient,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PlanDeskError::Config(format!("invalid mail-calendar base URL: {e}")))?;
        Ok(Self {
            http,
            base_url,
            tokens,
            lookback_hours: config.lookback_hours,
            lookahead_hours: config.lookahead_hours,
        })
    }

    fn events_url(&self) -> Result<Url> {
        let now = Utc::now();
        let from = now - chrono::Duration::hours(i64::from(self.lookback_hours));
        let to = now + chrono::Duration::hours(i64::from(self.lookahead_hours));

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PlanDeskError::Config("mail-calendar base URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(["me", "events"]);
        url.query_pairs_mut()
            .append_pair("$select", EVENT_FIELDS)
            .append_pair("$top", PAGE_SIZE)
            .append_pair("startDateTime", &from.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("endDateTime", &to.to_rfc3339_opts(SecondsFormat::Secs, true));
        Ok(url)
    }
}

#[async_trait]
impl SourceAdapter for MailCalendarAdapter {
    fn origin(&self) -> EventOrigin {
        EventOrigin::ExternalCalendar
    }

    #[instrument(skip(self))]
    async fn fetch_events(&self) -> Result<FetchOutcome> {
        let token = self.tokens.access_token().await?.ok_or_else(|| {
            PlanDeskError::Auth(
                "no mail-calendar access token available; connect the account first".to_string(),
            )
        })?;

        let url = self.events_url()?;
        let request = self.http.request(Method::GET, url).bearer_auth(token);
        let response = self.http.send(request).await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("mail-calendar events endpoint not available (404)");
                return Ok(FetchOutcome::NotImplemented);
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(PlanDeskError::Auth(format!(
                    "mail-calendar rejected the access token (HTTP {})",
                    response.status()
                )));
            }
            status if !status.is_success() => {
                return Err(PlanDeskError::Network(format!(
                    "mail-calendar returned HTTP {status}"
                )));
            }
            _ => {}
        }

        let envelope: MailEventsEnvelope = response
            .json()
            .await
            .map_err(|e| PlanDeskError::Network(format!("mail-calendar returned a non-JSON body: {e}")))?;

        debug!(count = envelope.value.len(), "fetched mail-calendar rows");
        Ok(FetchOutcome::Available(
            envelope.value.into_iter().map(MailEventRow::into_raw).collect(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct MailEventsEnvelope {
    #[serde(default)]
    value: Vec<MailEventRow>,
}

#[derive(Debug, Deserialize)]
struct MailEventRow {
    id: Option<String>,
    subject: Option<String>,
    #[serde(rename = "bodyPreview")]
    body_preview: Option<String>,
    start: Option<MailEventTime>,
    end: Option<MailEventTime>,
    #[serde(rename = "isAllDay")]
    is_all_day: Option<bool>,
    #[serde(rename = "calendarId")]
    calendar_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MailEventTime {
    #[serde(rename = "dateTime")]
    date_time: String,
}

impl MailEventRow {
    fn into_raw(self) -> RawExternalEvent {
        RawExternalEvent {
            external_id: self.id,
            title: self.subject,
            description: self.body_preview,
            start: self.start.map(|t| t.date_time),
            end: self.end.map(|t| t.date_time),
            is_all_day: self.is_all_day,
            project_ref: None,
            ticket_ref: None,
            resolver: None,
            calendar_id: self.calendar_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::StaticTokenProvider;
    use super::*;

    fn config(server: &MockServer) -> MailConfig {
        MailConfig {
            base_url: server.uri(),
            lookback_hours: 24,
            lookahead_hours: 48,
            timeout_secs: 2,
        }
    }

    fn adapter(server: &MockServer, token: Option<&str>) -> MailCalendarAdapter {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(2))
            .max_attempts(2)
            .base_backoff(Duration::from_millis(5))
            .build()
            .unwrap();
        MailCalendarAdapter::with_http(
            &config(server),
            Arc::new(StaticTokenProvider::new(token.map(str::to_string))),
            http,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_value_envelope_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/events"))
            .and(header("authorization", "Bearer tok-123"))
            .and(query_param("$select", EVENT_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    {
                        "id": "AAMkAD=",
                        "subject": "Weekly standup",
                        "bodyPreview": "Agenda",
                        "start": { "dateTime": "2026-01-05T09:00:00.0000000", "timeZone": "UTC" },
                        "end": { "dateTime": "2026-01-05T09:30:00.0000000", "timeZone": "UTC" },
                        "isAllDay": false,
                        "calendarId": "cal-primary"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = adapter(&server, Some("tok-123"));
        let FetchOutcome::Available(rows) = adapter.fetch_events().await.unwrap() else {
            panic!("expected available outcome");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].external_id.as_deref(), Some("AAMkAD="));
        assert_eq!(rows[0].title.as_deref(), Some("Weekly standup"));
        assert_eq!(rows[0].start.as_deref(), Some("2026-01-05T09:00:00.0000000"));
        assert_eq!(rows[0].is_all_day, Some(false));
        assert_eq!(rows[0].calendar_id.as_deref(), Some("cal-primary"));
    }

    #[tokio::test]
    async fn missing_token_is_an_authorization_error_without_any_request() {
        let server = MockServer::start().await;
        // No mock mounted: a request would fail the test via connection 404.
        let adapter = adapter(&server, None);

        let err = adapter.fetch_events().await.unwrap_err();
        assert!(matches!(err, PlanDeskError::Auth(_)), "{err:?}");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_is_an_authorization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/events"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let adapter = adapter(&server, Some("expired"));
        let err = adapter.fetch_events().await.unwrap_err();
        assert!(matches!(err, PlanDeskError::Auth(_)), "{err:?}");
    }

    #[tokio::test]
    async fn server_error_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/events"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let adapter = adapter(&server, Some("tok"));
        let err = adapter.fetch_events().await.unwrap_err();
        assert!(matches!(err, PlanDeskError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn missing_endpoint_reports_not_implemented() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/events"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let adapter = adapter(&server, Some("tok"));
        let outcome = adapter.fetch_events().await.unwrap();
        assert!(matches!(outcome, FetchOutcome::NotImplemented));
    }
}
