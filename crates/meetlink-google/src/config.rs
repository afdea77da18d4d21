//! Google OAuth client secrets and Calendar access configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CalendarError, CalendarResult};

/// Google's Calendar API v3 base URL.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google's OAuth consent page.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's OAuth token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth 2.0 client id and secret of a registered Google Cloud application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Layout of the client-secret JSON downloaded from the Cloud Console.
///
/// Either an `installed`/`web` section or `client_id`/`client_secret` at the
/// root (the layout some tools write).
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecretSection>,
    web: Option<ClientSecretSection>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretSection {
    client_id: String,
    client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads a client-secret JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> CalendarResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalendarError::configuration(format!(
                "failed to read client secret file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses a client-secret JSON document.
    pub fn from_json(json: &str) -> CalendarResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(json).map_err(|e| {
            CalendarError::configuration(format!("failed to parse client secret JSON: {}", e))
        })?;

        if let Some(section) = file.installed.or(file.web) {
            return Ok(Self::new(section.client_id, section.client_secret));
        }

        match (file.client_id, file.client_secret) {
            (Some(id), Some(secret)) => Ok(Self::new(id, secret)),
            _ => Err(CalendarError::configuration(
                "client secret file needs an 'installed' or 'web' section, \
                 or client_id and client_secret at the root",
            )),
        }
    }

    /// Checks that both values are present.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.trim().is_empty() {
            return Err("client_id is required");
        }
        if self.client_secret.trim().is_empty() {
            return Err("client_secret is required");
        }
        Ok(())
    }
}

/// Everything needed to authenticate and reach the Calendar service.
///
/// This is the explicit, injected replacement for "a token file in the
/// working directory": both the HTTP server and the CLI build one from
/// `config.toml` and hand it to [`crate::CredentialProvider`].
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Client-secret JSON, read only when a refresh or login needs it.
    pub credentials_file: PathBuf,

    /// Persisted OAuth token.
    pub token_path: PathBuf,

    /// Calendar to insert into and list from.
    pub calendar_id: String,

    /// IANA time zone attached to event start/end.
    pub time_zone: String,

    /// OAuth scopes the stored token must carry.
    pub scopes: Vec<String>,

    /// Timeout for each HTTP request to Google.
    pub timeout: Duration,

    /// Whether a browser login may be started when no usable token exists.
    pub allow_interactive: bool,

    /// Loopback port range for the login redirect. `(0, 0)` lets the OS pick.
    pub loopback_port_range: (u16, u16),

    /// Calendar API base URL.
    pub api_base_url: String,

    /// OAuth consent page URL.
    pub auth_url: String,

    /// OAuth token endpoint URL.
    pub token_url: String,
}

impl GoogleConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Scope required to create events with conference data.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar.events";

    /// Creates a configuration with default paths and Google endpoints.
    pub fn new() -> Self {
        Self {
            credentials_file: Self::default_credentials_path(),
            token_path: Self::default_token_path(),
            calendar_id: "primary".to_string(),
            time_zone: "UTC".to_string(),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            allow_interactive: true,
            loopback_port_range: (0, 0),
            api_base_url: CALENDAR_API_BASE.to_string(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// `~/.config/meetlink/credentials.json`
    pub fn default_credentials_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetlink")
            .join("credentials.json")
    }

    /// `~/.local/share/meetlink/token.json`
    pub fn default_token_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetlink")
            .join("token.json")
    }

    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = path.into();
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    pub fn with_time_zone(mut self, tz: impl Into<String>) -> Self {
        self.time_zone = tz.into();
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interactive(mut self, allow: bool) -> Self {
        self.allow_interactive = allow;
        self
    }

    pub fn with_loopback_port_range(mut self, start: u16, end: u16) -> Self {
        self.loopback_port_range = (start, end);
        self
    }

    /// Points the Calendar API at another base URL (a mock server in tests).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }
        if self.calendar_id.trim().is_empty() {
            return Err("calendar_id must not be empty".to_string());
        }
        if self.loopback_port_range.0 > self.loopback_port_range.1 {
            return Err("invalid loopback port range".to_string());
        }
        url::Url::parse(&self.api_base_url)
            .map_err(|e| format!("invalid api_base_url {}: {}", self.api_base_url, e))?;
        url::Url::parse(&self.token_url)
            .map_err(|e| format!("invalid token_url {}: {}", self.token_url, e))?;
        Ok(())
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_installed_app_flow() {
        let config = GoogleConfig::new();
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.time_zone, "UTC");
        assert_eq!(config.scopes, vec![GoogleConfig::DEFAULT_SCOPE.to_string()]);
        assert_eq!(config.loopback_port_range, (0, 0));
        assert!(config.allow_interactive);
        assert!(config.token_path.ends_with("meetlink/token.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_base_url_trailing_slash_is_trimmed() {
        let config = GoogleConfig::new().with_api_base_url("http://127.0.0.1:9999/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn validation_failures() {
        assert!(GoogleConfig::new().with_scopes(vec![]).validate().is_err());
        assert!(GoogleConfig::new().with_calendar_id(" ").validate().is_err());
        assert!(
            GoogleConfig::new()
                .with_loopback_port_range(9000, 8000)
                .validate()
                .is_err()
        );
        assert!(
            GoogleConfig::new()
                .with_api_base_url("not a url")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn client_secret_installed_section() {
        let json = r#"{
            "installed": {
                "client_id": "abc.apps.googleusercontent.com",
                "client_secret": "shh",
                "project_id": "demo",
                "redirect_uris": ["http://localhost"]
            }
        }"#;
        let creds = OAuthCredentials::from_json(json).unwrap();
        assert_eq!(creds, OAuthCredentials::new("abc.apps.googleusercontent.com", "shh"));
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn client_secret_web_section() {
        let json = r#"{"web": {"client_id": "web-id", "client_secret": "web-secret"}}"#;
        let creds = OAuthCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "web-id");
    }

    #[test]
    fn client_secret_flat_layout() {
        let json = r#"{"client_id": "flat-id", "client_secret": "flat-secret", "refresh_token": "r"}"#;
        let creds = OAuthCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_secret, "flat-secret");
    }

    #[test]
    fn client_secret_missing_fields() {
        let err = OAuthCredentials::from_json(r#"{"other": {}}"#).unwrap_err();
        assert!(err.message().contains("client_id"));

        let err = OAuthCredentials::from_json("not json").unwrap_err();
        assert!(err.message().contains("parse"));
    }

    #[test]
    fn client_secret_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = OAuthCredentials::from_file(dir.path().join("nope.json")).unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::CalendarErrorCode::ConfigurationError
        );
    }

    #[test]
    fn empty_values_fail_validation() {
        assert!(OAuthCredentials::new("", "s").validate().is_err());
        assert!(OAuthCredentials::new("id", " ").validate().is_err());
    }
}
