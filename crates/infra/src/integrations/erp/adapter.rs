//! HTTP adapter for the ERP planning calendar.
//!
//! The ERP exposes a plain unauthenticated `GET <base>/calendar`. The
//! endpoint predates the calendar feature on some installations, so a 404
//! means "not available yet" rather than an error. Error pages arrive as
//! HTML with status 200 on misconfigured proxies, hence the explicit
//! non-JSON handling.

use std::time::Duration;

use async_trait::async_trait;
use plandesk_core::sync::ports::{FetchOutcome, SourceAdapter};
use plandesk_domain::{ErpConfig, EventOrigin, PlanDeskError, RawExternalEvent, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::http::HttpClient;

/// Fetches raw planning-calendar rows from the ERP web API.
pub struct ErpCalendarAdapter {
    http: HttpClient,
    base_url: Url,
}

impl ErpCalendarAdapter {
    pub fn new(config: &ErpConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("plandesk")
            .build()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PlanDeskError::Config(format!("invalid ERP base URL: {e}")))?;
        Ok(Self { http, base_url })
    }

    /// Same adapter with an externally built client, for tests that need
    /// short backoffs.
    pub fn with_http(config: &ErpConfig, http: HttpClient) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PlanDeskError::Config(format!("invalid ERP base URL: {e}")))?;
        Ok(Self { http, base_url })
    }

    fn calendar_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PlanDeskError::Config("ERP base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("calendar");
        Ok(url)
    }
}

#[async_trait]
impl SourceAdapter for ErpCalendarAdapter {
    fn origin(&self) -> EventOrigin {
        EventOrigin::Erp
    }

    #[instrument(skip(self))]
    async fn fetch_events(&self) -> Result<FetchOutcome> {
        let url = self.calendar_url()?;
        let response = self.http.send(self.http.request(Method::GET, url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("ERP calendar endpoint not available (404)");
            return Ok(FetchOutcome::NotImplemented);
        }
        if !response.status().is_success() {
            return Err(PlanDeskError::Network(format!(
                "ERP calendar returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| crate::errors::InfraError::from(e).0)?;
        let rows = parse_calendar_body(&body)?;
        debug!(count = rows.len(), "fetched ERP calendar rows");
        Ok(FetchOutcome::Available(rows.into_iter().map(ErpCalendarRow::into_raw).collect()))
    }
}

/// One planning-calendar row as the ERP serves it. Field names on the wire
/// are the ERP's Czech column names.
#[derive(Debug, Deserialize)]
struct ErpCalendarRow {
    #[serde(rename = "nazev")]
    title: Option<String>,
    #[serde(rename = "popis")]
    description: Option<String>,
    #[serde(rename = "datum_od")]
    start: Option<String>,
    #[serde(rename = "datum_do")]
    end: Option<String>,
    #[serde(rename = "projekt")]
    project: Option<String>,
    #[serde(rename = "jira_klic")]
    ticket: Option<String>,
    #[serde(rename = "resitel")]
    resolver: Option<String>,
}

impl ErpCalendarRow {
    fn into_raw(self) -> RawExternalEvent {
        RawExternalEvent {
            external_id: None,
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            is_all_day: None,
            project_ref: self.project,
            ticket_ref: self.ticket,
            resolver: self.resolver,
            calendar_id: None,
        }
    }
}

/// The API serves either a bare array or a `{"data": [...]}` envelope,
/// depending on the ERP version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErpCalendarResponse {
    Envelope { data: Vec<ErpCalendarRow> },
    Bare(Vec<ErpCalendarRow>),
}

fn parse_calendar_body(body: &str) -> Result<Vec<ErpCalendarRow>> {
    let parsed: ErpCalendarResponse = serde_json::from_str(body).map_err(|e| {
        PlanDeskError::Network(format!("ERP calendar returned a non-JSON body: {e}"))
    })?;
    Ok(match parsed {
        ErpCalendarResponse::Envelope { data } => data,
        ErpCalendarResponse::Bare(rows) => rows,
    })
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn adapter_for(server: &MockServer) -> ErpCalendarAdapter {
        let config = ErpConfig { base_url: server.uri(), timeout_secs: 2 };
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(2))
            .max_attempts(2)
            .base_backoff(Duration::from_millis(5))
            .build()
            .unwrap();
        ErpCalendarAdapter::with_http(&config, http).unwrap()
    }

    #[tokio::test]
    async fn fetches_bare_array_with_czech_field_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "nazev": "Upgrade wave 3",
                    "popis": "Core modules",
                    "datum_od": "2026-01-05",
                    "datum_do": "2026-01-07",
                    "projekt": "ABC",
                    "jira_klic": "ABC-1",
                    "resitel": "Jane"
                }
            ])))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let FetchOutcome::Available(rows) = adapter.fetch_events().await.unwrap() else {
            panic!("expected available outcome");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Upgrade wave 3"));
        assert_eq!(rows[0].ticket_ref.as_deref(), Some("ABC-1"));
        assert_eq!(rows[0].project_ref.as_deref(), Some("ABC"));
        assert_eq!(rows[0].resolver.as_deref(), Some("Jane"));
        assert!(rows[0].external_id.is_none());
    }

    #[tokio::test]
    async fn accepts_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "nazev": "Patch", "datum_od": "2026-01-01", "datum_do": "2026-01-02", "resitel": "Jane" }
                ]
            })))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let FetchOutcome::Available(rows) = adapter.fetch_events().await.unwrap() else {
            panic!("expected available outcome");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].resolver.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn missing_endpoint_reports_not_implemented() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let outcome = adapter.fetch_events().await.unwrap();
        assert!(matches!(outcome, FetchOutcome::NotImplemented));
    }

    #[tokio::test]
    async fn html_body_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html>login required</html>"),
            )
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let err = adapter.fetch_events().await.unwrap_err();
        assert!(matches!(err, PlanDeskError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn server_error_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let err = adapter.fetch_events().await.unwrap_err();
        assert!(matches!(err, PlanDeskError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn base_url_with_path_keeps_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web/calendar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let config = ErpConfig { base_url: format!("{}/web", server.uri()), timeout_secs: 2 };
        let adapter = ErpCalendarAdapter::new(&config).unwrap();
        let outcome = adapter.fetch_events().await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Available(rows) if rows.is_empty()));
    }
}
