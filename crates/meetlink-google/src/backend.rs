//! MeetingBackend trait and the Google implementation.
//!
//! The HTTP server and the CLI talk to a `dyn MeetingBackend`, so tests can
//! swap the Calendar service for an in-memory fake.

use std::future::Future;
use std::pin::Pin;

use meetlink_core::{MeetingRequest, MeetingResult};
use tracing::debug;

use crate::client::GoogleCalendarClient;
use crate::config::GoogleConfig;
use crate::credentials::CredentialProvider;
use crate::error::{CalendarError, CalendarResult};
use crate::meetings;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Creates and lists meetings with conference links.
pub trait MeetingBackend: Send + Sync {
    /// Returns the backend name (e.g. "google").
    fn name(&self) -> &str;

    /// Creates a meeting and returns it with its conference link.
    fn create_meeting(&self, request: MeetingRequest) -> BoxFuture<'_, CalendarResult<MeetingResult>>;

    /// Lists up to `max_results` upcoming meetings that have a conference link.
    fn list_upcoming(&self, max_results: usize) -> BoxFuture<'_, CalendarResult<Vec<MeetingResult>>>;
}

/// Google Calendar backend.
///
/// Every operation obtains credentials first (re-reading the token file and
/// refreshing if needed), then builds a fresh Calendar client.
#[derive(Debug, Clone)]
pub struct GoogleBackend {
    credentials: CredentialProvider,
}

impl GoogleBackend {
    pub fn new(config: GoogleConfig) -> CalendarResult<Self> {
        config.validate().map_err(CalendarError::configuration)?;
        Ok(Self {
            credentials: CredentialProvider::new(config),
        })
    }

    pub fn credentials(&self) -> &CredentialProvider {
        &self.credentials
    }

    async fn service(&self) -> CalendarResult<GoogleCalendarClient> {
        let token = self.credentials.get_credentials().await?;
        debug!("building calendar client");
        GoogleCalendarClient::new(token.access_token, self.credentials.config())
    }
}

impl MeetingBackend for GoogleBackend {
    fn name(&self) -> &str {
        "google"
    }

    fn create_meeting(&self, request: MeetingRequest) -> BoxFuture<'_, CalendarResult<MeetingResult>> {
        Box::pin(async move {
            let service = self.service().await?;
            meetings::create_meeting(&service, &request).await
        })
    }

    fn list_upcoming(&self, max_results: usize) -> BoxFuture<'_, CalendarResult<Vec<MeetingResult>>> {
        Box::pin(async move {
            let service = self.service().await?;
            meetings::list_upcoming(&service, max_results).await
        })
    }
}
