//! Google Calendar API v3 client.
//!
//! Low-level HTTP access to the two endpoints meetlink needs: event insert
//! and event list. Request and response bodies are modelled with serde; the
//! mapping to [`meetlink_core::MeetingResult`] lives in [`crate::meetings`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GoogleConfig;
use crate::error::{CalendarError, CalendarResult};

/// Authenticated handle to one calendar, the equivalent of a built
/// `calendar v3` service object.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
    calendar_id: String,
    time_zone: String,
}

/// Whom the Calendar service should email about a new event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendUpdates {
    All,
    None,
}

impl SendUpdates {
    /// `all` when there is anyone to invite, `none` otherwise.
    pub fn for_attendees(attendees: &[String]) -> Self {
        if attendees.is_empty() {
            Self::None
        } else {
            Self::All
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::None => "none",
        }
    }
}

/// Query for the events.list endpoint.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub time_min: DateTime<Utc>,
    pub max_results: usize,
    /// Expand recurring series into individual instances.
    pub single_events: bool,
}

impl GoogleCalendarClient {
    /// Creates a client for the calendar and endpoints named in `config`.
    pub fn new(access_token: impl Into<String>, config: &GoogleConfig) -> CalendarResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("meetlink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CalendarError::internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            base_url: config.api_base_url.clone(),
            calendar_id: config.calendar_id.clone(),
            time_zone: config.time_zone.clone(),
        })
    }

    /// Time zone attached to event start/end.
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    /// Inserts an event with conference data generation enabled
    /// (`conferenceDataVersion=1`).
    pub async fn insert_event(
        &self,
        event: &EventPayload,
        send_updates: SendUpdates,
    ) -> CalendarResult<ApiEvent> {
        debug!(
            calendar = %self.calendar_id,
            send_updates = send_updates.as_str(),
            "inserting event"
        );

        let response = self
            .http_client
            .post(self.events_url())
            .bearer_auth(&self.access_token)
            .query(&[
                ("conferenceDataVersion", "1"),
                ("sendUpdates", send_updates.as_str()),
            ])
            .json(event)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Lists events ordered by start time. Only the first page is read;
    /// `max_results` bounds it.
    pub async fn list_events(&self, query: &ListQuery) -> CalendarResult<Vec<ApiEvent>> {
        let response = self
            .http_client
            .get(self.events_url())
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", query.time_min.to_rfc3339()),
                ("maxResults", query.max_results.to_string()),
                ("singleEvents", query.single_events.to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        let list: EventListResponse = parse_response(response).await?;
        debug!(
            calendar = %self.calendar_id,
            count = list.items.len(),
            "listed events"
        );
        Ok(list.items)
    }
}

/// Turns a response into `T`, or into the remote error text.
async fn parse_response<T>(response: reqwest::Response) -> CalendarResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(CalendarError::from_response(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| CalendarError::invalid_response(format!("failed to parse response: {}", e)))
}

/// Body of an events.insert request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub summary: String,
    pub start: PayloadTime,
    pub end: PayloadTime,
    pub conference_data: PayloadConferenceData,
    pub attendees: Vec<PayloadAttendee>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadConferenceData {
    pub create_request: CreateConferenceRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    /// Client-generated idempotency token; must differ per request.
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadAttendee {
    pub email: String,
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

/// An event as returned by the Calendar service.
///
/// Every field is optional here; the adapter decides which absences are
/// errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub html_link: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    #[serde(default)]
    pub attendees: Vec<ApiAttendee>,
    pub conference_data: Option<ApiConferenceData>,
}

/// Event start or end.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAttendee {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConferenceData {
    #[serde(default)]
    pub entry_points: Vec<ApiEntryPoint>,
    pub create_request: Option<ApiCreateRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEntryPoint {
    pub entry_point_type: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateRequest {
    pub status: Option<ApiCreateStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateStatus {
    /// `pending`, `success` or `failure`.
    pub status_code: Option<String>,
}
