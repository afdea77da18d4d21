//! Router assembly: routes, CORS, request tracing.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handlers::{self, AppState};

/// Builds the application router.
pub fn router(state: AppState, config: &ServerConfig) -> ServerResult<Router> {
    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/create", post(handlers::create_meeting))
        .route("/upcoming", get(handlers::upcoming_meetings))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins)?)
        .with_state(state))
}

/// CORS for the configured origins, with credentials. Methods and headers
/// are mirrored from the preflight request.
pub fn cors_layer(origins: &[String]) -> ServerResult<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| ServerError::config(format!("invalid CORS origin {}: {}", origin, e)))
        })
        .collect::<ServerResult<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
