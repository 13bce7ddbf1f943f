use crate::analytics::DayBucketer;
use chrono::{DateTime, Utc};

/// Formats a past datetime relative to the calendar day of `now`
///
/// Examples:
/// - Same day: "today"
/// - Previous day: "yesterday"
/// - 3 days back: "3 days ago"
/// - 30 days or more back: "on 2025-02-10"
/// - In the future (clock skew): "today"
pub fn format_days_ago(past: DateTime<Utc>, now: DateTime<Utc>, bucketer: &DayBucketer) -> String {
    let days = (bucketer.day_key(now) - bucketer.day_key(past)).num_days();

    if days <= 0 {
        "today".to_string()
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 30 {
        format!("{} days ago", days)
    } else {
        format!("on {}", bucketer.day_key(past).format("%Y-%m-%d"))
    }
}
