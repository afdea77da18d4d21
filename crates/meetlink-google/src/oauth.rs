//! Installed-application OAuth 2.0 flow (Authorization Code + PKCE) with a
//! loopback redirect, plus refresh-token exchange.
//!
//! 1. Generate a code verifier, its S256 challenge and a random state
//! 2. Bind a listener on `127.0.0.1` (an OS-assigned port by default)
//! 3. Open the consent page in the browser (the URL is also printed)
//! 4. Read the single redirect carrying `code` and `state`
//! 5. Exchange the code and verifier for tokens

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{GoogleConfig, OAuthCredentials};
use crate::error::{CalendarError, CalendarResult};
use crate::tokens::TokenInfo;

/// PKCE code verifier length in bytes, before base64 encoding.
const CODE_VERIFIER_LENGTH: usize = 32;

/// How long to wait for the browser redirect.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// How long one accepted connection may take to send its request line.
const CONNECTION_READ_TIMEOUT: Duration = Duration::from_secs(2);

const SUCCESS_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n\
    <html><body><h1>Authentication complete</h1>\
    <p>You can close this window and return to meetlink.</p></body></html>";

const FAILURE_PAGE: &str = "HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n\
    <html><body><h1>Authentication failed</h1>\
    <p>You can close this window.</p></body></html>";

/// Talks to Google's OAuth endpoints on behalf of one registered client.
#[derive(Debug)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    http_client: reqwest::Client,
    auth_url: String,
    token_url: String,
}

/// Result of a refresh-token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_in: Option<i64>,
    /// Present only when Google rotates the refresh token.
    pub refresh_token: Option<String>,
}

impl OAuthClient {
    /// Creates a client using the endpoints and timeout from `config`.
    pub fn new(credentials: OAuthCredentials, config: &GoogleConfig) -> CalendarResult<Self> {
        credentials
            .validate()
            .map_err(|e| CalendarError::configuration(format!("invalid OAuth client: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CalendarError::internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            http_client,
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        })
    }

    /// Runs the browser login and returns the issued tokens.
    pub async fn authorize(
        &self,
        scopes: &[String],
        port_range: (u16, u16),
    ) -> CalendarResult<TokenInfo> {
        let pkce = PkceFlow::new();

        let listener = bind_loopback(port_range)?;
        let port = listener
            .local_addr()
            .map_err(|e| CalendarError::internal(format!("loopback address unavailable: {}", e)))?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{}/", port);

        let auth_url = pkce.build_auth_url(
            &self.auth_url,
            &self.credentials.client_id,
            &redirect_uri,
            scopes,
        );

        info!(port, "waiting for OAuth redirect");
        eprintln!("Please visit this URL to authorize meetlink:\n\n{}\n", auth_url);
        if let Err(e) = open::that(&auth_url) {
            warn!("failed to open browser: {}", e);
        }

        let callback = tokio::task::spawn_blocking(move || wait_for_callback(listener))
            .await
            .map_err(|e| CalendarError::internal(format!("callback listener failed: {}", e)))??;

        if callback.state != pkce.state {
            return Err(CalendarError::authentication(
                "OAuth state mismatch, refusing the redirect",
            ));
        }

        info!("received authorization code, exchanging for tokens");
        let response = self
            .token_request(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", callback.code.as_str()),
                ("code_verifier", pkce.verifier.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .await?;

        // Google reports the granted scopes; fall back to the requested ones.
        let granted = response
            .scope
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(|| scopes.to_vec());

        Ok(TokenInfo::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            granted,
        )
        .with_client(&self.credentials.client_id, &self.credentials.client_secret))
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> CalendarResult<RefreshedToken> {
        let response = self
            .token_request(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .await?;

        info!("refreshed access token");
        Ok(RefreshedToken {
            access_token: response.access_token,
            expires_in: response.expires_in,
            refresh_token: response.refresh_token,
        })
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> CalendarResult<TokenResponse> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CalendarError::authentication(format!(
                "token endpoint returned {}: {}",
                status,
                body.trim()
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            CalendarError::invalid_response(format!("invalid token response: {}", e))
        })
    }
}

/// Binds the first free port of the range on the loopback interface.
fn bind_loopback(port_range: (u16, u16)) -> CalendarResult<TcpListener> {
    for port in port_range.0..=port_range.1 {
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)) {
            debug!(port, "bound loopback listener");
            return Ok(listener);
        }
    }
    Err(CalendarError::configuration(format!(
        "no available loopback port in range {}-{}",
        port_range.0, port_range.1
    )))
}

/// Authorization code and state read from the redirect.
#[derive(Debug, PartialEq, Eq)]
struct Callback {
    code: String,
    state: String,
}

/// Accepts connections until one carries an OAuth redirect, or times out.
fn wait_for_callback(listener: TcpListener) -> CalendarResult<Callback> {
    wait_for_callback_until(listener, Instant::now() + CALLBACK_TIMEOUT)
}

fn wait_for_callback_until(listener: TcpListener, deadline: Instant) -> CalendarResult<Callback> {
    listener
        .set_nonblocking(true)
        .map_err(|e| CalendarError::internal(format!("failed to configure listener: {}", e)))?;

    while Instant::now() < deadline {
        match listener.accept() {
            Ok((stream, _)) => {
                if let Some(result) = handle_connection(stream, deadline) {
                    return result;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => warn!("failed to accept redirect connection: {}", e),
        }
    }

    Err(CalendarError::authentication("timed out waiting for OAuth redirect"))
}

/// Reads one request and answers the browser.
///
/// Returns `None` for requests that are not the redirect (favicon and such)
/// and for connections that stay silent past the read timeout.
fn handle_connection(mut stream: TcpStream, deadline: Instant) -> Option<CalendarResult<Callback>> {
    let timeout = deadline
        .saturating_duration_since(Instant::now())
        .min(CONNECTION_READ_TIMEOUT);
    if timeout.is_zero() {
        return None;
    }
    stream.set_nonblocking(false).ok()?;
    stream.set_read_timeout(Some(timeout)).ok()?;
    stream.set_write_timeout(Some(timeout)).ok()?;

    let mut request_line = String::new();
    if let Err(e) = BufReader::new(&stream).read_line(&mut request_line) {
        debug!("dropping redirect connection: {}", e);
        return None;
    }

    let target = request_line.split_whitespace().nth(1)?;
    let result = parse_redirect(target)?;

    let page = if result.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };
    let _ = stream.write_all(page.as_bytes());
    let _ = stream.flush();

    Some(result)
}

/// Extracts `code`/`state` (or `error`) from a redirect request target.
fn parse_redirect(target: &str) -> Option<CalendarResult<Callback>> {
    let url = Url::parse("http://127.0.0.1").ok()?.join(target).ok()?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => {
                return Some(Err(CalendarError::authentication(format!(
                    "authorization denied: {}",
                    value
                ))));
            }
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    let code = code?;
    Some(Ok(Callback {
        code,
        state: state.unwrap_or_default(),
    }))
}

/// PKCE verifier/challenge pair and CSRF state (RFC 7636).
#[derive(Debug)]
pub struct PkceFlow {
    pub verifier: String,
    pub challenge: String,
    pub state: String,
}

impl PkceFlow {
    /// Creates a flow with a fresh random verifier and state.
    pub fn new() -> Self {
        let verifier = random_token(CODE_VERIFIER_LENGTH);
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
            state: random_token(16),
        }
    }

    /// Builds the consent page URL.
    pub fn build_auth_url(
        &self,
        auth_url: &str,
        client_id: &str,
        redirect_uri: &str,
        scopes: &[String],
    ) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&\
            code_challenge={}&code_challenge_method=S256&state={}&\
            access_type=offline&prompt=consent",
            auth_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes.join(" ")),
            urlencoding::encode(&self.challenge),
            urlencoding::encode(&self.state),
        )
    }
}

impl Default for PkceFlow {
    fn default() -> Self {
        Self::new()
    }
}

fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
}
