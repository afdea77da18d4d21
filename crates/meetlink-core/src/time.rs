//! Time type for meeting start/end values.
//!
//! The Calendar service reports event times either as an RFC3339 timestamp or,
//! for all-day events, as a bare date. [`MeetingTime`] keeps whichever form was
//! returned so it can be echoed back to callers verbatim.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A meeting start or end time.
///
/// Serializes as a plain string: `2024-03-15T10:00:00+00:00` or `2024-03-15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeetingTime {
    /// A specific instant, keeping the offset the service reported.
    DateTime(DateTime<FixedOffset>),
    /// An all-day date.
    Date(NaiveDate),
}

impl MeetingTime {
    /// Creates a `DateTime` variant from a UTC instant.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt.fixed_offset())
    }

    /// Parses an RFC3339 timestamp, falling back to a `YYYY-MM-DD` date.
    pub fn parse(value: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(Self::DateTime(dt));
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .map(Self::Date)
    }

    /// Returns `true` for all-day dates.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Converts to UTC. All-day dates map to midnight UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => dt.with_timezone(&Utc),
            Self::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

impl From<DateTime<Utc>> for MeetingTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_rfc3339_keeps_offset() {
        let time = MeetingTime::parse("2024-03-15T10:00:00-04:00").unwrap();
        match time {
            MeetingTime::DateTime(dt) => assert_eq!(dt.offset().local_minus_utc(), -4 * 3600),
            MeetingTime::Date(_) => panic!("expected a timestamp"),
        }
        assert_eq!(
            time.to_utc(),
            Utc.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_all_day_date() {
        let time = MeetingTime::parse("2024-03-15").unwrap();
        assert!(time.is_all_day());
        assert_eq!(
            time.to_utc(),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(MeetingTime::parse("tomorrow-ish").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let value = serde_json::to_value(MeetingTime::from_utc(utc)).unwrap();
        let text = value.as_str().unwrap();
        assert!(text.starts_with("2024-03-15T10:00:00"));
        assert_eq!(MeetingTime::parse(text).unwrap().to_utc(), utc);

        let date = MeetingTime::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-03-15\"");
    }

    #[test]
    fn deserializes_both_forms() {
        let dt: MeetingTime = serde_json::from_str("\"2024-03-15T10:00:00Z\"").unwrap();
        assert!(!dt.is_all_day());

        let date: MeetingTime = serde_json::from_str("\"2024-03-15\"").unwrap();
        assert!(date.is_all_day());
    }

    #[test]
    fn display_matches_serialized_form() {
        let date = MeetingTime::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(date.to_string(), "2024-01-02");
    }
}
