//! Presentation helpers shared by list and detail views.

use chrono::DateTime;

pub const NOT_AVAILABLE: &str = "N/A";

/// (value, label) pairs for the status filter; the empty value means all.
pub const STATUS_FILTER_OPTIONS: [(&str, &str); 3] =
    [("", "All Statuses"), ("open", "Open"), ("closed", "Closed")];

pub const STATUS_OPTIONS: [(&str, &str); 2] = [("open", "Open"), ("closed", "Closed")];

pub const SORT_OPTIONS: [(&str, &str); 2] = [("desc", "Newest First"), ("asc", "Oldest First")];

/// `M/D/YYYY` in UTC, or "N/A" for 0 and out-of-range timestamps.
pub fn format_date(timestamp: i64) -> String {
    format_utc(timestamp, "%-m/%-d/%Y")
}

/// `M/D/YYYY at h:MM AM|PM` in UTC, or "N/A" for 0 and out-of-range timestamps.
pub fn format_date_time(timestamp: i64) -> String {
    format_utc(timestamp, "%-m/%-d/%Y at %-I:%M %p")
}

fn format_utc(timestamp: i64, pattern: &str) -> String {
    if timestamp == 0 {
        return NOT_AVAILABLE.to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
