//! Error types for credential and Calendar API operations.

use std::fmt;

use thiserror::Error;

/// The category of a [`CalendarError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarErrorCode {
    /// No usable token, refresh rejected, or interactive flow unavailable.
    AuthenticationFailed,
    /// Token lacks the permission for the operation (HTTP 403).
    AuthorizationFailed,
    /// Connection failure, timeout, unreadable body.
    NetworkError,
    /// Too many requests (HTTP 429).
    RateLimited,
    /// The Calendar service rejected the request or failed (other non-2xx).
    ApiError,
    /// The response lacked a field needed to build a result.
    InvalidResponse,
    /// The meeting request cannot be sent (start or end out of range).
    InvalidRequest,
    /// Missing or invalid local configuration (client secret, token file).
    ConfigurationError,
    /// Unexpected local failure.
    InternalError,
}

impl CalendarErrorCode {
    /// Returns a stable snake_case name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ApiError => "api_error",
            Self::InvalidResponse => "invalid_response",
            Self::InvalidRequest => "invalid_request",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }

    /// Classifies a non-success HTTP status from a Google endpoint.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::AuthenticationFailed,
            reqwest::StatusCode::FORBIDDEN => Self::AuthorizationFailed,
            reqwest::StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            _ => Self::ApiError,
        }
    }
}

impl fmt::Display for CalendarErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from obtaining credentials or talking to the Calendar service.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CalendarError {
    code: CalendarErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CalendarError {
    /// Creates a new error with the given code and message.
    pub fn new(code: CalendarErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(CalendarErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(CalendarErrorCode::NetworkError, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(CalendarErrorCode::ApiError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(CalendarErrorCode::InvalidResponse, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(CalendarErrorCode::InvalidRequest, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(CalendarErrorCode::ConfigurationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CalendarErrorCode::InternalError, message)
    }

    /// Builds an error from a non-success response of a Google endpoint.
    ///
    /// The response body (Google's JSON error document) is kept verbatim so
    /// the caller sees the remote explanation.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        Self::new(
            CalendarErrorCode::from_status(status),
            format!("<HttpError {} returned \"{}\">", status.as_u16(), body.trim()),
        )
    }

    /// Prefixes the message, keeping the code.
    ///
    /// `CalendarError::api("boom").context("List error")` displays as
    /// `List error: boom`.
    pub fn context(mut self, prefix: &str) -> Self {
        self.message = format!("{}: {}", prefix, self.message);
        self
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> CalendarErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<meetlink_core::TimeRangeError> for CalendarError {
    fn from(err: meetlink_core::TimeRangeError) -> Self {
        Self::invalid_request(err.to_string()).with_source(err)
    }
}

impl From<reqwest::Error> for CalendarError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timeout".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        Self::network(message).with_source(err)
    }
}

/// A specialized Result type for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_names() {
        assert_eq!(
            CalendarErrorCode::AuthenticationFailed.as_str(),
            "authentication_failed"
        );
        assert_eq!(CalendarErrorCode::InvalidResponse.to_string(), "invalid_response");
    }

    #[test]
    fn time_range_is_invalid_request() {
        let err: CalendarError = meetlink_core::TimeRangeError {
            what: "duration",
            minutes: 9_000_000_000_000,
        }
        .into();
        assert_eq!(err.code(), CalendarErrorCode::InvalidRequest);
        assert_eq!(
            err.to_string(),
            "duration of 9000000000000 minutes is out of range"
        );
    }

    #[test]
    fn code_from_status() {
        use reqwest::StatusCode;
        assert_eq!(
            CalendarErrorCode::from_status(StatusCode::UNAUTHORIZED),
            CalendarErrorCode::AuthenticationFailed
        );
        assert_eq!(
            CalendarErrorCode::from_status(StatusCode::FORBIDDEN),
            CalendarErrorCode::AuthorizationFailed
        );
        assert_eq!(
            CalendarErrorCode::from_status(StatusCode::TOO_MANY_REQUESTS),
            CalendarErrorCode::RateLimited
        );
        assert_eq!(
            CalendarErrorCode::from_status(StatusCode::BAD_REQUEST),
            CalendarErrorCode::ApiError
        );
    }

    #[test]
    fn from_response_keeps_remote_text() {
        let err = CalendarError::from_response(
            reqwest::StatusCode::BAD_REQUEST,
            "{\"error\": {\"message\": \"Invalid start time.\"}}\n",
        );
        assert_eq!(err.code(), CalendarErrorCode::ApiError);
        assert!(err.message().contains("400"));
        assert!(err.message().contains("Invalid start time."));
    }

    #[test]
    fn context_prefixes_message() {
        let err = CalendarError::api("boom").context("List error");
        assert_eq!(err.to_string(), "List error: boom");
        assert_eq!(err.code(), CalendarErrorCode::ApiError);
    }

    #[test]
    fn with_source_is_exposed() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = CalendarError::internal("failed to write").with_source(io_err);
        assert!(err.source().is_some());
    }
}
