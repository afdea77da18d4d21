//! Google Calendar backend for meetlink.
//!
//! - [`CredentialProvider`]: stored token, refresh, or browser login (PKCE)
//! - [`GoogleCalendarClient`]: events.insert / events.list over REST
//! - [`create_meeting`] / [`list_upcoming`]: the adapter between
//!   [`meetlink_core::MeetingRequest`] and the Calendar event shape
//! - [`MeetingBackend`]: the seam the server and CLI depend on
//!
//! ```ignore
//! use meetlink_google::{GoogleBackend, GoogleConfig, MeetingBackend};
//!
//! let backend = GoogleBackend::new(GoogleConfig::new())?;
//! let upcoming = backend.list_upcoming(5).await?;
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod meetings;
pub mod oauth;
pub mod tokens;

pub use backend::{BoxFuture, GoogleBackend, MeetingBackend};
pub use client::{GoogleCalendarClient, SendUpdates};
pub use config::{GoogleConfig, OAuthCredentials};
pub use credentials::CredentialProvider;
pub use error::{CalendarError, CalendarErrorCode, CalendarResult};
pub use meetings::{create_meeting, list_upcoming};
pub use tokens::{TokenInfo, TokenStorage};
