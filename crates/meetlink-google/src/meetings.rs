//! Create and list meetings with Google Meet links.
//!
//! Maps [`MeetingRequest`] to an events.insert payload and Calendar events
//! back to [`MeetingResult`]. Remote errors keep the Calendar service's text
//! behind a fixed prefix; fields missing from a response are reported as
//! [`CalendarErrorCode::InvalidResponse`](crate::CalendarErrorCode).

use chrono::{DateTime, SecondsFormat, Utc};
use meetlink_core::{MeetingRequest, MeetingResult, MeetingTime};
use tracing::{debug, info};

use crate::client::{
    ApiEvent, ApiEventTime, ConferenceSolutionKey, CreateConferenceRequest, EventPayload,
    GoogleCalendarClient, ListQuery, PayloadAttendee, PayloadConferenceData, PayloadTime,
    SendUpdates,
};
use crate::error::{CalendarError, CalendarResult};

/// Conference solution for Google Meet.
pub const HANGOUTS_MEET: &str = "hangoutsMeet";

/// Creates an event with an auto-generated Meet link.
pub async fn create_meeting(
    service: &GoogleCalendarClient,
    request: &MeetingRequest,
) -> CalendarResult<MeetingResult> {
    let payload = build_event_payload(request, service.time_zone(), &new_request_id())?;
    let send_updates = SendUpdates::for_attendees(&request.attendees);

    let event = service
        .insert_event(&payload, send_updates)
        .await
        .map_err(|e| e.context("Calendar API error"))?;

    let result = meeting_from_created(&event)?;
    info!(
        id = result.id.as_deref().unwrap_or_default(),
        link = %result.meet_link,
        "created meeting"
    );
    Ok(result)
}

/// Lists upcoming events that carry conference data, soonest first.
///
/// Events without conference data are skipped.
pub async fn list_upcoming(
    service: &GoogleCalendarClient,
    max_results: usize,
) -> CalendarResult<Vec<MeetingResult>> {
    let query = ListQuery {
        time_min: Utc::now(),
        max_results,
        single_events: true,
    };

    let events = service
        .list_events(&query)
        .await
        .map_err(|e| e.context("List error"))?;

    let total = events.len();
    let meetings = events
        .iter()
        .filter(|event| event.conference_data.is_some())
        .map(meeting_from_listed)
        .collect::<CalendarResult<Vec<_>>>()?;

    debug!(total, with_conference = meetings.len(), "filtered upcoming events");
    Ok(meetings)
}

/// `meet-<uuid>`, fresh for every call.
pub fn new_request_id() -> String {
    format!("meet-{}", uuid::Uuid::new_v4())
}

/// Builds the events.insert body for `request`.
pub fn build_event_payload(
    request: &MeetingRequest,
    time_zone: &str,
    request_id: &str,
) -> CalendarResult<EventPayload> {
    let end = request.end()?;
    Ok(EventPayload {
        summary: request.title.clone(),
        start: payload_time(request.start, time_zone),
        end: payload_time(end, time_zone),
        conference_data: PayloadConferenceData {
            create_request: CreateConferenceRequest {
                request_id: request_id.to_string(),
                conference_solution_key: ConferenceSolutionKey {
                    kind: HANGOUTS_MEET.to_string(),
                },
            },
        },
        attendees: request
            .attendees
            .iter()
            .map(|email| PayloadAttendee {
                email: email.clone(),
            })
            .collect(),
    })
}

fn payload_time(at: DateTime<Utc>, time_zone: &str) -> PayloadTime {
    PayloadTime {
        date_time: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        time_zone: time_zone.to_string(),
    }
}

fn meeting_from_created(event: &ApiEvent) -> CalendarResult<MeetingResult> {
    let html_link = event
        .html_link
        .as_deref()
        .ok_or_else(|| missing("htmlLink", event))?;
    let id = event.id.as_deref().ok_or_else(|| missing("id", event))?;

    let mut result = meeting_from_listed(event)?
        .with_html_link(html_link)
        .with_id(id);

    if let Some(end) = &event.end {
        result = result.with_end(event_time(end, "end", event)?);
    }

    let attendees = event
        .attendees
        .iter()
        .filter_map(|a| a.email.clone())
        .collect();
    Ok(result.with_attendees(attendees))
}

fn meeting_from_listed(event: &ApiEvent) -> CalendarResult<MeetingResult> {
    let title = event
        .summary
        .as_deref()
        .ok_or_else(|| missing("summary", event))?;
    let start = event.start.as_ref().ok_or_else(|| missing("start", event))?;
    let start = event_time(start, "start", event)?;

    Ok(MeetingResult::new(title, start, meet_link(event)?))
}

/// First conference entry point URI.
fn meet_link(event: &ApiEvent) -> CalendarResult<String> {
    let conference = event
        .conference_data
        .as_ref()
        .ok_or_else(|| missing("conferenceData", event))?;

    if let Some(uri) = conference.entry_points.first().and_then(|ep| ep.uri.clone()) {
        return Ok(uri);
    }

    let pending = conference
        .create_request
        .as_ref()
        .and_then(|r| r.status.as_ref())
        .and_then(|s| s.status_code.as_deref())
        == Some("pending");
    if pending {
        return Err(CalendarError::invalid_response(format!(
            "conference for event {} is still pending",
            event_label(event)
        )));
    }
    Err(missing("conferenceData.entryPoints[0].uri", event))
}

/// `dateTime`, falling back to the all-day `date`.
fn event_time(time: &ApiEventTime, field: &str, event: &ApiEvent) -> CalendarResult<MeetingTime> {
    let raw = time
        .date_time
        .as_deref()
        .or(time.date.as_deref())
        .ok_or_else(|| missing(field, event))?;

    MeetingTime::parse(raw).ok_or_else(|| {
        CalendarError::invalid_response(format!(
            "event {} has an unreadable {} '{}'",
            event_label(event),
            field,
            raw
        ))
    })
}

fn missing(field: &str, event: &ApiEvent) -> CalendarError {
    CalendarError::invalid_response(format!(
        "event {} has no {}",
        event_label(event),
        field
    ))
}

fn event_label(event: &ApiEvent) -> &str {
    event.id.as_deref().unwrap_or("<unknown>")
}
