//! HTTP API for meetlink.
//!
//! Three endpoints over a [`MeetingBackend`]:
//!
//! - `GET /`: greeting
//! - `POST /create`: create a meeting with a Meet link
//! - `GET /upcoming`: upcoming meetings that have a Meet link
//!
//! Backend failures become HTTP 500 with `{"detail": "<error text>"}`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod signals;

use std::future::Future;
use std::io;
use std::sync::Arc;

use meetlink_google::MeetingBackend;
use tokio::net::TcpListener;
use tracing::info;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use handlers::AppState;
pub use routes::router;
pub use signals::shutdown_signal;

/// Binds `config.bind` and serves until `shutdown` completes.
pub async fn serve<F>(
    config: ServerConfig,
    backend: Arc<dyn MeetingBackend>,
    shutdown: F,
) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(backend, config.upcoming_limit);
    let app = router(state, &config)?;

    let listener = TcpListener::bind(config.bind).await.map_err(|e| {
        if e.kind() == io::ErrorKind::AddrInUse {
            ServerError::addr_in_use(config.bind.to_string())
        } else {
            ServerError::Io(e)
        }
    })?;

    info!(addr = %listener.local_addr()?, "HTTP API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP API stopped");
    Ok(())
}
