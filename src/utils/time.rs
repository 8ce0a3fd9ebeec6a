//! Time utilities
//!
//! Contest time fields carry an authoritative string form that is either
//! an absolute RFC 3339 timestamp or an offset relative to the contest
//! start (`+H:MM:SS` / `-H:MM:SS`). These helpers resolve both forms.

use chrono::{DateTime, Duration, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a datetime string in RFC 3339 / ISO 8601 format
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Whether a time string is relative to the contest start
pub fn is_relative(s: &str) -> bool {
    s.starts_with('+') || s.starts_with('-')
}

/// Parse a relative time string of the form `+H:MM:SS` or `-H:MM:SS`.
/// The hours field may be arbitrarily large; minutes and seconds must be
/// two digits below 60.
pub fn parse_relative(s: &str) -> Option<Duration> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1i64, &s[1..]),
        b'-' => (-1i64, &s[1..]),
        _ => return None,
    };

    let mut parts = rest.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes_str = parts.next()?;
    let seconds_str = parts.next()?;
    if parts.next().is_some() || minutes_str.len() != 2 || seconds_str.len() != 2 {
        return None;
    }
    let minutes: i64 = minutes_str.parse().ok()?;
    let seconds: i64 = seconds_str.parse().ok()?;
    if hours < 0 || minutes >= 60 || seconds >= 60 {
        return None;
    }

    Some(Duration::seconds(sign * (hours * 3600 + minutes * 60 + seconds)))
}

/// Resolve a time string against a start time: relative strings offset the
/// start, absolute strings parse as fixed calendar timestamps.
pub fn resolve_time_string(s: &str, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if is_relative(s) {
        parse_relative(s).map(|offset| start + offset)
    } else {
        parse_datetime(s)
    }
}

/// Format a duration as a human-readable string
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 0 {
        return "0s".to_string();
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{}s", seconds));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_relative() {
        assert_eq!(parse_relative("+1:00:00"), Some(Duration::hours(1)));
        assert_eq!(parse_relative("+0:05:30"), Some(Duration::seconds(330)));
        assert_eq!(parse_relative("-0:30:00"), Some(Duration::minutes(-30)));
        assert_eq!(parse_relative("+100:00:00"), Some(Duration::hours(100)));

        assert_eq!(parse_relative("1:00:00"), None);
        assert_eq!(parse_relative("+1:60:00"), None);
        assert_eq!(parse_relative("+1:00"), None);
        assert_eq!(parse_relative("+1:0:00"), None);
        assert_eq!(parse_relative("junk"), None);
    }

    #[test]
    fn test_resolve_time_string() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let frozen = resolve_time_string("+4:00:00", start).unwrap();
        assert_eq!(frozen, start + Duration::hours(4));

        let absolute = resolve_time_string("2024-06-01T15:00:00Z", start).unwrap();
        assert_eq!(absolute, Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap());

        assert!(resolve_time_string("not a time", start).is_none());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(30)), "30s");
        assert_eq!(format_duration(Duration::seconds(90)), "1m 30s");
        assert_eq!(format_duration(Duration::seconds(3661)), "1h 1m 1s");
    }
}
