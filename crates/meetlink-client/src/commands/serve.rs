//! Run the HTTP API in the foreground.

use std::sync::Arc;

use meetlink_google::{GoogleBackend, GoogleConfig, MeetingBackend};
use meetlink_server::{ServerConfig, shutdown_signal};
use tracing::info;

use crate::error::ClientResult;

/// Serves the HTTP API until SIGINT/SIGTERM.
pub async fn run(google: GoogleConfig, server: ServerConfig) -> ClientResult<()> {
    let backend: Arc<dyn MeetingBackend> = Arc::new(GoogleBackend::new(google)?);

    info!(
        bind = %server.bind,
        origins = ?server.cors_origins,
        "starting HTTP API"
    );
    println!("Serving meetlink API on http://{}", server.bind);

    meetlink_server::serve(server, backend, shutdown_signal()).await?;
    Ok(())
}
