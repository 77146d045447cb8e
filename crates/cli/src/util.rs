//! Shared formatting for CLI output

use pollwatch_core::now_nanos;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Largest unit first: (seconds per unit, label)
const AGE_UNITS: &[(i64, &str)] = &[
    (604_800, "weeks"),
    (86_400, "days"),
    (3_600, "hours"),
    (60, "minutes"),
    (1, "seconds"),
];

/// Time of day (UTC) of a Unix-nanosecond timestamp, "14:30:05"
pub fn format_clock(unix_nanos: i64) -> String {
    let secs_of_day = (unix_nanos.max(0) / NANOS_PER_SEC) % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        secs_of_day / 3_600,
        secs_of_day % 3_600 / 60,
        secs_of_day % 60
    )
}

/// How long ago a Unix-nanosecond timestamp was, "3 hours ago"
pub fn format_age(unix_nanos: i64) -> String {
    if unix_nanos <= 0 {
        return "unknown".to_string();
    }

    let secs = (now_nanos() - unix_nanos) / NANOS_PER_SEC;
    if secs < 0 {
        return "in the future".to_string();
    }

    AGE_UNITS
        .iter()
        .find(|(unit, _)| secs >= *unit)
        .map(|(unit, label)| format!("{} {} ago", secs / unit, label))
        .unwrap_or_else(|| "just now".to_string())
}

/// Byte count with a binary unit, "1.50 KB"
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB"] {
        if value < 1024.0 {
            return if unit == "B" {
                format!("{} B", bytes)
            } else {
                format!("{:.2} {}", value, unit)
            };
        }
        value /= 1024.0;
    }
    format!("{:.2} GB", value)
}
