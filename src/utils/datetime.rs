//! Date and time helpers for backup file names and listings.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// Timestamp layout embedded in backup file names: an ISO-8601 instant with
/// `:` and `.` replaced by `-` so it is safe on every filesystem.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S-%3fZ";

/// Format an instant for a backup file name (millisecond precision).
pub fn format_backup_timestamp(at: DateTime<Utc>) -> String {
    at.format(BACKUP_TIMESTAMP_FORMAT).to_string()
}

/// Parse the timestamp part of a backup file name.
pub fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Describe how long ago `then` was, relative to `now`.
///
/// Recent instants read as "just now", "5 minutes ago", "3 hours ago",
/// "yesterday" or "4 days ago"; anything older than a month shows the date,
/// with the year only when it differs from `now`.
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    if elapsed.num_seconds() < 0 {
        return then.format("%b %d, %Y %H:%M").to_string();
    }

    match elapsed.num_minutes() {
        0 => return "just now".to_string(),
        1 => return "1 minute ago".to_string(),
        minutes if minutes < 60 => return format!("{minutes} minutes ago"),
        _ => {}
    }

    match elapsed.num_hours() {
        1 => return "1 hour ago".to_string(),
        hours if hours < 24 => return format!("{hours} hours ago"),
        _ => {}
    }

    match elapsed.num_days() {
        1 => "yesterday".to_string(),
        days if days <= 30 => format!("{days} days ago"),
        _ if then.year() == now.year() => then.format("%b %d").to_string(),
        _ => then.format("%b %d, %Y").to_string(),
    }
}
