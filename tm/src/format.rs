//! Display formatting for timestamps and dates

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// Creation time in local time, e.g. `9 May 14:02`
pub fn format_created_at(created_at: DateTime<Utc>) -> String {
    format_created_in(created_at, &Local)
}

fn format_created_in<Tz: TimeZone>(created_at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    created_at.with_timezone(tz).format("%-d %b %-H:%M").to_string()
}

/// Due date as `dd.mm.yyyy`
pub fn format_due_date(due_date: NaiveDate) -> String {
    due_date.format("%d.%m.%Y").to_string()
}

/// Format a timestamp as a human-readable "time ago" string
pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    format_time_ago_from(timestamp, Utc::now())
}

fn format_time_ago_from(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - timestamp;

    if diff.num_milliseconds() < 0 {
        return "just now".to_string();
    }

    let diff_days = diff.num_days();
    let diff_hours = diff.num_hours();
    let diff_mins = diff.num_minutes();

    if diff_days > 0 {
        format!("{}d ago", diff_days)
    } else if diff_hours > 0 {
        format!("{}h ago", diff_hours)
    } else if diff_mins > 0 {
        format!("{}m ago", diff_mins)
    } else {
        "just now".to_string()
    }
}

/// Parse a due date typed by the user
///
/// Empty input means "no due date". Anything else must be `YYYY-MM-DD`.
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Invalid due date '{}', expected YYYY-MM-DD", input))
}
