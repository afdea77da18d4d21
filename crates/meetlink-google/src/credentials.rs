//! Credential provider.
//!
//! Produces a usable access token for the Calendar scope: the stored token
//! when it is still good, a refreshed one when it has expired, or a fresh one
//! from the browser login when neither works.

use tracing::{debug, info};

use crate::config::{GoogleConfig, OAuthCredentials};
use crate::error::{CalendarError, CalendarResult};
use crate::oauth::OAuthClient;
use crate::tokens::{TokenInfo, TokenStorage};

/// Obtains, refreshes and persists the OAuth token described by a
/// [`GoogleConfig`].
///
/// Holds no token in memory: every [`get_credentials`](Self::get_credentials)
/// call starts from the token file.
#[derive(Debug, Clone)]
pub struct CredentialProvider {
    config: GoogleConfig,
    storage: TokenStorage,
}

impl CredentialProvider {
    pub fn new(config: GoogleConfig) -> Self {
        let storage = TokenStorage::new(&config.token_path);
        Self { config, storage }
    }

    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    pub fn storage(&self) -> &TokenStorage {
        &self.storage
    }

    /// Returns a token that is valid now.
    ///
    /// 1. stored token with the required scopes and not expired: returned as is
    /// 2. expired but refreshable: refreshed and saved
    /// 3. otherwise: browser login (when allowed) and saved
    pub async fn get_credentials(&self) -> CalendarResult<TokenInfo> {
        let required = &self.config.scopes;

        if let Some(token) = self.storage.load()? {
            if !token.has_scopes(required) {
                info!("stored token lacks required scopes, login needed");
            } else if !token.is_expired() {
                debug!("using stored token");
                return Ok(token);
            } else if token.refresh_token.is_some() {
                return self.refresh(token).await;
            } else {
                info!("stored token expired and has no refresh token");
            }
        }

        self.login().await
    }

    /// Runs the browser login unconditionally when `force` is set, otherwise
    /// behaves like [`get_credentials`](Self::get_credentials).
    pub async fn authenticate(&self, force: bool) -> CalendarResult<TokenInfo> {
        if force {
            self.storage.clear()?;
            return self.interactive_login().await;
        }
        self.get_credentials().await
    }

    async fn refresh(&self, mut token: TokenInfo) -> CalendarResult<TokenInfo> {
        let Some(refresh_token) = token.refresh_token.clone() else {
            return Err(CalendarError::authentication("no refresh token"));
        };

        debug!("refreshing expired access token");
        let credentials = match (&token.client_id, &token.client_secret) {
            (Some(id), Some(secret)) => OAuthCredentials::new(id, secret),
            _ => OAuthCredentials::from_file(&self.config.credentials_file)?,
        };

        let refreshed = OAuthClient::new(credentials, &self.config)?
            .refresh(&refresh_token)
            .await?;

        token.apply_refresh(
            refreshed.access_token,
            refreshed.expires_in,
            refreshed.refresh_token,
        );
        self.storage.save(&token)?;
        Ok(token)
    }

    async fn login(&self) -> CalendarResult<TokenInfo> {
        if !self.config.allow_interactive {
            return Err(CalendarError::authentication(format!(
                "no valid token in {} and interactive login is disabled, run 'meetlink auth'",
                self.storage.path().display()
            )));
        }
        self.interactive_login().await
    }

    async fn interactive_login(&self) -> CalendarResult<TokenInfo> {
        info!("starting Google authentication flow");
        let credentials = OAuthCredentials::from_file(&self.config.credentials_file)?;
        let token = OAuthClient::new(credentials, &self.config)?
            .authorize(&self.config.scopes, self.config.loopback_port_range)
            .await?;

        self.storage.save(&token)?;
        info!("authentication successful");
        Ok(token)
    }
}
