//! Server error types.

use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use meetlink_core::TimeRangeError;
use meetlink_google::CalendarError;
use serde::Serialize;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (bind, accept).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Address already taken.
    #[error("Address already in use: {addr}")]
    AddrInUse { addr: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an address in use error.
    pub fn addr_in_use(addr: impl Into<String>) -> Self {
        Self::AddrInUse { addr: addr.into() }
    }
}

/// JSON body of a failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A request failure, rendered as HTTP 500 with `{"detail": "<text>"}`.
#[derive(Debug)]
pub struct ApiError {
    detail: String,
}

impl ApiError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<TimeRangeError> for ApiError {
    fn from(err: TimeRangeError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        Self::new(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_error_text_becomes_detail() {
        let err: ApiError = CalendarError::api("boom").context("List error").into();
        assert_eq!(err.detail(), "List error: boom");
    }

    #[test]
    fn api_error_is_500() {
        let response = ApiError::new("nope").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn server_error_messages() {
        assert_eq!(
            ServerError::config("bad origin").to_string(),
            "Configuration error: bad origin"
        );
        assert_eq!(
            ServerError::addr_in_use("127.0.0.1:8000").to_string(),
            "Address already in use: 127.0.0.1:8000"
        );
    }
}
