//! Request handlers.
//!
//! Each handler is stateless: it turns the JSON body into a
//! [`MeetingRequest`], hands it to the backend, and returns the result or a
//! 500 with the error text.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use meetlink_core::{
    DEFAULT_DURATION_MINUTES, DEFAULT_START_IN_MINUTES, MeetingRequest, MeetingResult,
};
use meetlink_google::MeetingBackend;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};

/// Greeting returned by `GET /`.
pub const GREETING: &str = "Google Meet Web API - Use /create and /upcoming";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn MeetingBackend>,
    pub upcoming_limit: usize,
}

impl AppState {
    pub fn new(backend: Arc<dyn MeetingBackend>, upcoming_limit: usize) -> Self {
        Self {
            backend,
            upcoming_limit,
        }
    }
}

/// Body of `POST /create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateMeetingBody {
    pub title: String,
    #[serde(default = "default_start_in_minutes")]
    pub start_in_minutes: i64,
    /// Duration in minutes.
    #[serde(default = "default_duration")]
    pub duration: i64,
    #[serde(default)]
    pub attendees: Vec<String>,
}

fn default_start_in_minutes() -> i64 {
    DEFAULT_START_IN_MINUTES
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: &'static str,
}

/// `GET /`
pub async fn root() -> Json<Greeting> {
    Json(Greeting { message: GREETING })
}

/// `POST /create`
pub async fn create_meeting(
    State(state): State<AppState>,
    Json(body): Json<CreateMeetingBody>,
) -> ApiResult<Json<MeetingResult>> {
    let request = MeetingRequest::starting_in(
        body.title,
        Utc::now(),
        body.start_in_minutes,
        body.duration,
    )
    .map_err(|e| {
        error!("rejected create request: {}", e);
        ApiError::from(e)
    })?
    .with_attendees(body.attendees);

    info!(
        title = %request.title,
        start = %request.start,
        attendees = request.attendees.len(),
        "creating meeting"
    );

    let meeting = state.backend.create_meeting(request).await.map_err(|e| {
        error!(code = %e.code(), "create failed: {}", e);
        e
    })?;
    Ok(Json(meeting))
}

/// `GET /upcoming`
pub async fn upcoming_meetings(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MeetingResult>>> {
    let meetings = state
        .backend
        .list_upcoming(state.upcoming_limit)
        .await
        .map_err(|e| {
            error!(code = %e.code(), "list failed: {}", e);
            e
        })?;
    Ok(Json(meetings))
}
