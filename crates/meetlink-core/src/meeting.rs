//! Meeting request and result types.
//!
//! - [`MeetingRequest`]: what a caller asks for; built per request and never
//!   persisted (the Calendar service is the system of record)
//! - [`MeetingResult`]: what the adapter hands back, returned verbatim to the
//!   HTTP or console caller

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::MeetingTime;

/// Default offset from "now" for a meeting start, in minutes.
pub const DEFAULT_START_IN_MINUTES: i64 = 5;

/// Default meeting duration, in minutes.
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// A minute count that moves an instant outside the representable range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} of {minutes} minutes is out of range")]
pub struct TimeRangeError {
    /// Which value overflowed (`start offset` or `duration`).
    pub what: &'static str,
    pub minutes: i64,
}

/// A request to create a meeting with a conference link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    /// Event title.
    pub title: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// Duration in minutes.
    pub duration_minutes: i64,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
}

impl MeetingRequest {
    /// Creates a request starting at `start` with no attendees.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            title: title.into(),
            start,
            duration_minutes,
            attendees: Vec::new(),
        }
    }

    /// Creates a request starting `offset_minutes` after `now`.
    ///
    /// Fails when either the start or the end cannot be represented.
    pub fn starting_in(
        title: impl Into<String>,
        now: DateTime<Utc>,
        offset_minutes: i64,
        duration_minutes: i64,
    ) -> Result<Self, TimeRangeError> {
        let start = add_minutes(now, offset_minutes, "start offset")?;
        let request = Self::new(title, start, duration_minutes);
        request.end()?;
        Ok(request)
    }

    /// Builder method to set attendees.
    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = attendees;
        self
    }

    /// End instant (`start + duration`).
    pub fn end(&self) -> Result<DateTime<Utc>, TimeRangeError> {
        add_minutes(self.start, self.duration_minutes, "duration")
    }

    /// Returns `true` if any attendee should be invited.
    pub fn has_attendees(&self) -> bool {
        !self.attendees.is_empty()
    }
}

fn add_minutes(
    at: DateTime<Utc>,
    minutes: i64,
    what: &'static str,
) -> Result<DateTime<Utc>, TimeRangeError> {
    Duration::try_minutes(minutes)
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or(TimeRangeError { what, minutes })
}

/// A meeting as reported back by the Calendar service.
///
/// Listings only fill `title`, `start` and `meet_link`; the optional fields
/// are omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingResult {
    /// Event title.
    pub title: String,
    /// Start time.
    pub start: MeetingTime,
    /// Conference (video meeting) join URI.
    pub meet_link: String,
    /// Calendar page URI for the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    /// Remote event identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<MeetingTime>,
    /// Attendee email addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
}

impl MeetingResult {
    /// Creates a listing-shaped result.
    pub fn new(title: impl Into<String>, start: MeetingTime, meet_link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start,
            meet_link: meet_link.into(),
            html_link: None,
            id: None,
            end: None,
            attendees: None,
        }
    }

    /// Builder method to set the calendar page link.
    pub fn with_html_link(mut self, link: impl Into<String>) -> Self {
        self.html_link = Some(link.into());
        self
    }

    /// Builder method to set the event id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: MeetingTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to set attendee emails.
    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = Some(attendees);
        self
    }
}
