//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Google credential or Calendar error.
    #[error("{0}")]
    Calendar(#[from] meetlink_google::CalendarError),

    /// HTTP server error.
    #[error("server error: {0}")]
    Server(#[from] meetlink_server::ServerError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output rendering error.
    #[error("output error: {0}")]
    Output(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_error_text_is_kept() {
        let err: ClientError = meetlink_google::CalendarError::api("boom")
            .context("List error")
            .into();
        assert_eq!(err.to_string(), "List error: boom");
    }

    #[test]
    fn config_error_prefix() {
        assert_eq!(
            ClientError::Config("bad".to_string()).to_string(),
            "configuration error: bad"
        );
    }
}
