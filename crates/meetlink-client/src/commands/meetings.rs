//! One-shot create and list commands, plus the console rendering shared with
//! the demo.

use std::io::Write;

use meetlink_core::{MeetingRequest, MeetingResult};
use meetlink_google::MeetingBackend;

use crate::error::{ClientError, ClientResult};

const RULE_WIDTH: usize = 60;

/// Create a meeting and print it.
pub async fn create(
    backend: &dyn MeetingBackend,
    request: MeetingRequest,
    json: bool,
    out: &mut impl Write,
) -> ClientResult<()> {
    let meeting = backend.create_meeting(request).await?;

    if json {
        write_json(out, &meeting)
    } else {
        write_created(out, &meeting)
    }
}

/// List up to `limit` upcoming meetings with a Meet link.
pub async fn upcoming(
    backend: &dyn MeetingBackend,
    limit: usize,
    json: bool,
    out: &mut impl Write,
) -> ClientResult<()> {
    let meetings = backend.list_upcoming(limit).await?;

    if json {
        write_json(out, &meetings)
    } else {
        write_upcoming(out, &meetings)
    }
}

/// Prints a created meeting as a labelled block.
pub fn write_created(out: &mut impl Write, meeting: &MeetingResult) -> ClientResult<()> {
    let rule = "-".repeat(RULE_WIDTH);
    writeln!(out, "{}", rule)?;
    writeln!(out, "Title:      {}", meeting.title)?;
    writeln!(out, "Start:      {}", meeting.start)?;
    if let Some(end) = &meeting.end {
        writeln!(out, "End:        {}", end)?;
    }
    writeln!(out, "Meet Link:  {}", meeting.meet_link)?;
    if let Some(link) = &meeting.html_link {
        writeln!(out, "Calendar:   {}", link)?;
    }
    if let Some(id) = &meeting.id {
        writeln!(out, "Event ID:   {}", id)?;
    }
    if let Some(attendees) = &meeting.attendees
        && !attendees.is_empty()
    {
        writeln!(out, "Attendees:  {}", attendees.join(", "))?;
    }
    writeln!(out, "{}", rule)?;
    Ok(())
}

/// Prints a numbered list of upcoming meetings.
pub fn write_upcoming(out: &mut impl Write, meetings: &[MeetingResult]) -> ClientResult<()> {
    if meetings.is_empty() {
        writeln!(out, "No upcoming meetings found with Meet links.")?;
        return Ok(());
    }

    writeln!(out, "Found {} upcoming meeting(s):", meetings.len())?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for (i, meeting) in meetings.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, meeting.title)?;
        writeln!(out, "   Start: {}", meeting.start)?;
        writeln!(out, "   Link:  {}", meeting.meet_link)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> ClientResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ClientError::Output(format!("failed to serialize output: {}", e)))?;
    writeln!(out, "{}", text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetlink_core::MeetingTime;

    fn meeting() -> MeetingResult {
        MeetingResult::new(
            "Team Sync",
            MeetingTime::parse("2024-03-15T10:00:00+00:00").unwrap(),
            "https://meet.google.com/abc-defg-hij",
        )
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> ClientResult<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn created_block_lists_known_fields() {
        let full = meeting()
            .with_id("evt1")
            .with_html_link("https://calendar/evt1")
            .with_end(MeetingTime::parse("2024-03-15T10:30:00+00:00").unwrap())
            .with_attendees(vec!["a@example.com".to_string(), "b@example.com".to_string()]);

        let text = render(|out| write_created(out, &full));
        assert!(text.contains("Title:      Team Sync\n"));
        assert!(text.contains("Start:      2024-03-15T10:00:00+00:00\n"));
        assert!(text.contains("End:        2024-03-15T10:30:00+00:00\n"));
        assert!(text.contains("Meet Link:  https://meet.google.com/abc-defg-hij\n"));
        assert!(text.contains("Calendar:   https://calendar/evt1\n"));
        assert!(text.contains("Event ID:   evt1\n"));
        assert!(text.contains("Attendees:  a@example.com, b@example.com\n"));
    }

    #[test]
    fn created_block_skips_missing_fields() {
        let text = render(|out| write_created(out, &meeting().with_attendees(vec![])));
        assert!(!text.contains("End:"));
        assert!(!text.contains("Event ID:"));
        assert!(!text.contains("Attendees:"));
    }

    #[test]
    fn upcoming_list_is_numbered() {
        let mut second = meeting();
        second.title = "Retro".to_string();
        let text = render(|out| write_upcoming(out, &[meeting(), second]));
        assert!(text.starts_with("Found 2 upcoming meeting(s):\n"));
        assert!(text.contains("1. Team Sync\n"));
        assert!(text.contains("2. Retro\n"));
        assert!(text.contains("   Link:  https://meet.google.com/abc-defg-hij\n"));
    }

    #[test]
    fn empty_upcoming_list() {
        let text = render(|out| write_upcoming(out, &[]));
        assert_eq!(text, "No upcoming meetings found with Meet links.\n");
    }
}
