//! Persisted OAuth tokens.
//!
//! The token file is the credential's only home: it is read on every
//! [`crate::CredentialProvider::get_credentials`] call and rewritten after a
//! refresh or login. Deleting it is the only way to invalidate it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CalendarError, CalendarResult};

/// Seconds shaved off the reported lifetime so a token is refreshed before
/// Google starts rejecting it.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A stored OAuth token set.
///
/// Also reads token files written by Python's `google-auth`
/// (`token`/`expiry` keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Bearer token for API requests.
    #[serde(alias = "token")]
    pub access_token: String,

    /// Long-lived token used to mint new access tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// When the access token stops being usable.
    #[serde(default, alias = "expiry")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// OAuth client the token was issued to; lets a refresh run without the
    /// client-secret file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Last time the access token was obtained.
    #[serde(default = "Utc::now")]
    pub last_refresh: DateTime<Utc>,
}

impl TokenInfo {
    /// Creates a token set from a token endpoint response.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at: expires_in_secs.map(expiry_from_now),
            scopes,
            client_id: None,
            client_secret: None,
            last_refresh: Utc::now(),
        }
    }

    /// Builder method to remember the issuing OAuth client.
    pub fn with_client(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Returns true if the access token is expired or about to expire.
    ///
    /// A token without an expiry is treated as valid.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }

    /// Returns true if every required scope was granted.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        required.iter().all(|scope| self.scopes.contains(scope))
    }

    /// Replaces the access token after a refresh.
    ///
    /// Google may rotate the refresh token; a new one replaces the old.
    pub fn apply_refresh(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
        refresh_token: Option<String>,
    ) {
        self.access_token = access_token.into();
        self.expires_at = expires_in_secs.map(expiry_from_now);
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        self.last_refresh = Utc::now();
    }
}

fn expiry_from_now(secs: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(secs) - Duration::seconds(EXPIRY_MARGIN_SECS)
}

/// File-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the token file. `Ok(None)` when it does not exist.
    pub fn load(&self) -> CalendarResult<Option<TokenInfo>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no token file");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            CalendarError::configuration(format!("failed to read token file: {}", e))
        })?;

        let token = serde_json::from_str(&content).map_err(|e| {
            CalendarError::configuration(format!(
                "failed to parse token file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), "loaded token");
        Ok(Some(token))
    }

    /// Writes the token file atomically (temp file + rename), mode 0600 on Unix.
    pub fn save(&self, token: &TokenInfo) -> CalendarResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                CalendarError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(token)
            .map_err(|e| CalendarError::internal(format!("failed to serialize token: {}", e)))?;

        // Unique per writer: concurrent requests may refresh at the same time.
        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));

        write_private(&temp_path, content.as_bytes()).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CalendarError::configuration(format!("failed to write token file: {}", e))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CalendarError::configuration(format!("failed to replace token file: {}", e))
        })?;

        info!(path = %self.path.display(), "saved token");
        Ok(())
    }

    /// Deletes the token file if present.
    pub fn clear(&self) -> CalendarResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                CalendarError::configuration(format!("failed to remove token file: {}", e))
            })?;
            info!(path = %self.path.display(), "removed token");
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes `content` to a new file readable only by the owner.
fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}
