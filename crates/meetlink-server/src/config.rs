//! Server configuration.

use std::net::SocketAddr;

/// Default address for the HTTP API.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Origin of the local development frontend.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Default number of meetings returned by `GET /upcoming`.
pub const DEFAULT_UPCOMING_LIMIT: usize = 10;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,

    /// Origins allowed by CORS (credentials allowed).
    pub cors_origins: Vec<String>,

    /// `maxResults` for `GET /upcoming`.
    pub upcoming_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration listening on `bind`.
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            ..Default::default()
        }
    }

    /// Builder: set allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Builder: set the listing size.
    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = limit;
        self
    }
}
