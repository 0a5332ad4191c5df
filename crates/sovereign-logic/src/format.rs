//! Compact time formatting for player-facing text.

use chrono::{DateTime, SecondsFormat, Utc};

/// Compact duration: `45s`, `12m`, `3h`, `3h20m`, `2d`, `2d5h`.
///
/// Negative durations format as zero; anything under a minute shows at least `1s`.
pub fn format_duration_short(seconds: i64) -> String {
    let secs = seconds.max(0);
    if secs < 60 {
        return format!("{}s", secs.max(1));
    }
    if secs < 3_600 {
        return format!("{}m", secs / 60);
    }
    if secs < 86_400 {
        let h = secs / 3_600;
        let m = (secs / 60) % 60;
        return if m == 0 {
            format!("{h}h")
        } else {
            format!("{h}h{m}m")
        };
    }
    let days = secs / 86_400;
    let h = (secs / 3_600) % 24;
    if h == 0 {
        format!("{days}d")
    } else {
        format!("{days}d{h}h")
    }
}

/// Age of a timestamp relative to `now`, or `-` when it was never set.
pub fn format_age_short(now: i64, at: Option<i64>) -> String {
    match at {
        Some(at) => format_duration_short(now - at),
        None => "-".to_string(),
    }
}

/// RFC 3339 UTC rendering of a Unix timestamp (`2024-03-01T12:00:00Z`).
///
/// Timestamps outside chrono's range render as `-`.
pub fn format_rfc3339(unix_seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(unix_seconds, 0).map_or_else(
        || "-".to_string(),
        |at| at.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}
