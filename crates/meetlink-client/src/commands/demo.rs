//! Demo: create one sample meeting, then list what is coming up.
//!
//! Failures are printed and the demo carries on: a failed create skips the
//! result block, a failed list is reported as no meetings.

use std::io::Write;

use chrono::{DateTime, Utc};
use meetlink_core::MeetingRequest;
use meetlink_google::MeetingBackend;
use tracing::warn;

use super::meetings::{write_created, write_upcoming};
use crate::error::ClientResult;

pub const DEMO_TITLE: &str = "Team Sync - Demo Meeting";
pub const DEMO_START_IN_MINUTES: i64 = 60;
pub const DEMO_DURATION_MINUTES: i64 = 30;
pub const DEMO_LIST_LIMIT: usize = 5;

/// Runs the demo against `backend`, starting the sample meeting an hour
/// after `now`.
pub async fn run(
    backend: &dyn MeetingBackend,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> ClientResult<()> {
    let rule = "=".repeat(60);
    writeln!(out, "{}", rule)?;
    writeln!(out, "Google Meet Link Generator")?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;

    writeln!(out, "Creating a sample meeting...")?;
    let created = match MeetingRequest::starting_in(
        DEMO_TITLE,
        now,
        DEMO_START_IN_MINUTES,
        DEMO_DURATION_MINUTES,
    ) {
        Ok(request) => backend.create_meeting(request).await,
        Err(e) => Err(e.into()),
    };
    match created {
        Ok(meeting) => {
            writeln!(out)?;
            writeln!(out, "Meeting created successfully!")?;
            write_created(out, &meeting)?;
        }
        Err(e) => {
            warn!(code = %e.code(), "demo create failed");
            writeln!(out, "An error occurred: {}", e)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Fetching upcoming meetings with Meet links...")?;
    let upcoming = match backend.list_upcoming(DEMO_LIST_LIMIT).await {
        Ok(meetings) => meetings,
        Err(e) => {
            warn!(code = %e.code(), "demo list failed");
            writeln!(out, "An error occurred: {}", e)?;
            Vec::new()
        }
    };
    writeln!(out)?;
    write_upcoming(out, &upcoming)?;

    writeln!(out)?;
    writeln!(out, "Demo complete!")?;
    Ok(())
}
