//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/meetlink/config.toml` by default:
//!
//! ```toml
//! [google]
//! credentials_file = "~/.config/meetlink/credentials.json"
//! calendar_id = "primary"
//! time_zone = "Europe/Paris"
//!
//! [server]
//! bind = "127.0.0.1:8000"
//! cors_origins = ["http://localhost:3000"]
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use meetlink_google::GoogleConfig;
use meetlink_server::ServerConfig;
use meetlink_server::config::{DEFAULT_BIND, DEFAULT_CORS_ORIGIN, DEFAULT_UPCOMING_LIMIT};
use serde::{Deserialize, Serialize};

/// Configuration for the meetlink client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Google credential and Calendar settings.
    pub google: GoogleSettings,

    /// HTTP API settings.
    pub server: ServerSettings,
}

/// `[google]` section. Unset values fall back to [`GoogleConfig`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Client-secret JSON from the Google Cloud Console.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,

    /// Path to token storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,

    /// IANA time zone for created events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,

    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Allow a browser login when no usable token exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_interactive: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    /// `[start, end]` for the login redirect port; `[0, 0]` for any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loopback_port_range: Option<[u16; 2]>,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to listen on.
    pub bind: String,

    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,

    /// Meetings returned by `GET /upcoming`.
    pub upcoming_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetlink")
    }

    /// Validates both sections.
    pub fn validate(&self) -> Result<(), String> {
        self.google.to_google_config()?.validate()?;
        self.server.to_server_config()?;
        Ok(())
    }
}

impl GoogleSettings {
    /// Converts to the credential/Calendar configuration.
    pub fn to_google_config(&self) -> Result<GoogleConfig, String> {
        let mut config = GoogleConfig::new();

        if let Some(path) = &self.credentials_file {
            config = config.with_credentials_file(expand_home(path));
        }
        if let Some(path) = &self.token_path {
            config = config.with_token_path(expand_home(path));
        }
        if let Some(id) = &self.calendar_id {
            config = config.with_calendar_id(id);
        }
        if let Some(tz) = &self.time_zone {
            config = config.with_time_zone(tz);
        }
        if let Some(scopes) = &self.scopes {
            config = config.with_scopes(scopes.clone());
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                return Err("google.timeout_secs must be greater than 0".to_string());
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(allow) = self.allow_interactive {
            config = config.with_interactive(allow);
        }
        if let Some(url) = &self.api_base_url {
            config = config.with_api_base_url(url);
        }
        if let Some(url) = &self.token_url {
            config = config.with_token_url(url);
        }
        if let Some([start, end]) = self.loopback_port_range {
            config = config.with_loopback_port_range(start, end);
        }

        Ok(config)
    }
}

impl ServerSettings {
    /// Converts to the HTTP server configuration.
    pub fn to_server_config(&self) -> Result<ServerConfig, String> {
        let bind: SocketAddr = self
            .bind
            .parse()
            .map_err(|e| format!("invalid server.bind '{}': {}", self.bind, e))?;
        if self.upcoming_limit == 0 {
            return Err("server.upcoming_limit must be greater than 0".to_string());
        }

        Ok(ServerConfig::new(bind)
            .with_cors_origins(self.cors_origins.clone())
            .with_upcoming_limit(self.upcoming_limit))
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());

        let google = config.google.to_google_config().unwrap();
        assert_eq!(google.calendar_id, "primary");
        assert_eq!(google.time_zone, "UTC");

        let server = config.server.to_server_config().unwrap();
        assert_eq!(server.bind.to_string(), "127.0.0.1:8000");
        assert_eq!(server.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(server.upcoming_limit, 10);
    }

    #[test]
    fn full_file() {
        let toml = r#"
            [google]
            credentials_file = "/etc/meetlink/credentials.json"
            token_path = "/var/lib/meetlink/token.json"
            calendar_id = "team@example.com"
            time_zone = "America/New_York"
            timeout_secs = 10
            allow_interactive = false
            api_base_url = "http://127.0.0.1:9999/"
            loopback_port_range = [8080, 8090]

            [server]
            bind = "0.0.0.0:9000"
            cors_origins = ["https://app.example.com"]
            upcoming_limit = 5
        "#;
        let config: ClientConfig = toml::from_str(toml).unwrap();

        let google = config.google.to_google_config().unwrap();
        assert_eq!(
            google.credentials_file,
            PathBuf::from("/etc/meetlink/credentials.json")
        );
        assert_eq!(google.token_path, PathBuf::from("/var/lib/meetlink/token.json"));
        assert_eq!(google.calendar_id, "team@example.com");
        assert_eq!(google.time_zone, "America/New_York");
        assert_eq!(google.timeout, Duration::from_secs(10));
        assert!(!google.allow_interactive);
        assert_eq!(google.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(google.loopback_port_range, (8080, 8090));

        let server = config.server.to_server_config().unwrap();
        assert_eq!(server.bind.port(), 9000);
        assert_eq!(server.cors_origins, vec!["https://app.example.com".to_string()]);
        assert_eq!(server.upcoming_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values() {
        let settings = ServerSettings {
            bind: "not an address".to_string(),
            ..Default::default()
        };
        assert!(settings.to_server_config().is_err());

        let settings = ServerSettings {
            upcoming_limit: 0,
            ..Default::default()
        };
        assert!(settings.to_server_config().is_err());

        let google = GoogleSettings {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(google.to_google_config().is_err());

        let config = ClientConfig {
            google: GoogleSettings {
                scopes: Some(vec![]),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn home_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(Path::new("~/creds.json")),
                home.join("creds.json")
            );
        }
        assert_eq!(
            expand_home(Path::new("/abs/creds.json")),
            PathBuf::from("/abs/creds.json")
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[google]\ncalendar_id = \"work\"\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.google.calendar_id.as_deref(), Some("work"));

        std::fs::write(&path, "[google\n").unwrap();
        assert!(ClientConfig::load_from(&path).is_err());
        assert!(ClientConfig::load_from(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn dump_round_trips() {
        let config = ClientConfig {
            google: GoogleSettings {
                time_zone: Some("Asia/Tokyo".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
