//! Timestamp parsing and formatting utilities.
//!
//! Clip boundaries are whole seconds. Model output and query parameters use
//! `MM:SS`; platform APIs report durations as ISO-8601 (`PT1H2M3S`).

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Maximum reasonable clip boundary (24 hours in seconds).
pub const MAX_VIDEO_DURATION_SECS: u32 = 86_400;

static ISO8601_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$")
        .expect("valid duration pattern")
});

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Invalid timestamp format '{0}'. Use MM:SS")]
    InvalidFormat(String),

    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("Seconds component must be below 60, got {0}")]
    SecondsOutOfRange(u32),

    #[error("Timestamp exceeds maximum allowed duration ({} hours)", MAX_VIDEO_DURATION_SECS / 3600)]
    ExceedsMaxDuration,
}

/// Convert minutes and seconds components to total seconds.
pub fn minutes_seconds_to_total(minutes: u32, seconds: u32) -> Result<u32, TimestampError> {
    if seconds >= 60 {
        return Err(TimestampError::SecondsOutOfRange(seconds));
    }
    let total = minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or(TimestampError::ExceedsMaxDuration)?;
    if total > MAX_VIDEO_DURATION_SECS {
        return Err(TimestampError::ExceedsMaxDuration);
    }
    Ok(total)
}

/// Parse an `MM:SS` timestamp to total seconds.
///
/// # Examples
/// ```
/// use inky_models::timestamp::timestamp_to_seconds;
/// assert_eq!(timestamp_to_seconds("01:05").unwrap(), 65);
/// assert_eq!(timestamp_to_seconds("1:05").unwrap(), 65);
/// ```
pub fn timestamp_to_seconds(ts: &str) -> Result<u32, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let (minutes, seconds) = ts
        .split_once(':')
        .ok_or_else(|| TimestampError::InvalidFormat(ts.to_string()))?;

    let minutes = parse_component("minutes", minutes)?;
    let seconds = parse_component("seconds", seconds)?;
    minutes_seconds_to_total(minutes, seconds)
}

fn parse_component(name: &'static str, value: &str) -> Result<u32, TimestampError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimestampError::InvalidValue(name, value.to_string()));
    }
    value
        .parse()
        .map_err(|_| TimestampError::InvalidValue(name, value.to_string()))
}

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped into hours.
///
/// # Examples
/// ```
/// use inky_models::timestamp::seconds_to_timestamp;
/// assert_eq!(seconds_to_timestamp(65), "01:05");
/// assert_eq!(seconds_to_timestamp(7200), "120:00");
/// ```
pub fn seconds_to_timestamp(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Parse a clip boundary given either as plain seconds (`"65"`) or `MM:SS`.
pub fn parse_clip_time(value: &str) -> Result<u32, TimestampError> {
    let value = value.trim();
    if value.contains(':') {
        return timestamp_to_seconds(value);
    }
    if value.is_empty() {
        return Err(TimestampError::Empty);
    }
    let secs = parse_component("seconds", value)?;
    if secs > MAX_VIDEO_DURATION_SECS {
        return Err(TimestampError::ExceedsMaxDuration);
    }
    Ok(secs)
}

/// Parse an ISO-8601 duration (`PT5M0S`, `PT1H2M3S`, `P1DT2H`) to seconds.
///
/// Fractional seconds are truncated. Returns `None` for anything else.
pub fn parse_iso8601_duration(value: &str) -> Option<u32> {
    let caps = ISO8601_DURATION.captures(value.trim())?;
    if caps.iter().skip(1).all(|c| c.is_none()) {
        return None;
    }

    let part = |idx: usize, factor: u64| -> Option<u64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse::<u64>().ok()?.checked_mul(factor),
            None => Some(0),
        }
    };

    let total = part(1, 86_400)?
        .checked_add(part(2, 3_600)?)?
        .checked_add(part(3, 60)?)?
        .checked_add(part(4, 1)?)?;
    u32::try_from(total).ok()
}

/// Format seconds as an ISO-8601 duration in the shape YouTube reports.
pub fn format_iso8601_duration(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("PT{}H{}M{}S", hours, minutes, seconds)
    } else {
        format!("PT{}M{}S", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_seconds() {
        assert_eq!(timestamp_to_seconds("00:00").unwrap(), 0);
        assert_eq!(timestamp_to_seconds("01:05").unwrap(), 65);
        assert_eq!(timestamp_to_seconds("1:20").unwrap(), 80);
        assert_eq!(timestamp_to_seconds("53:53").unwrap(), 3233);
        assert_eq!(timestamp_to_seconds(" 10:00 ").unwrap(), 600);
    }

    #[test]
    fn test_timestamp_to_seconds_errors() {
        assert_eq!(timestamp_to_seconds(""), Err(TimestampError::Empty));
        assert!(matches!(timestamp_to_seconds("90"), Err(TimestampError::InvalidFormat(_))));
        assert!(matches!(
            timestamp_to_seconds("ab:10"),
            Err(TimestampError::InvalidValue("minutes", _))
        ));
        assert!(matches!(
            timestamp_to_seconds("1:2:3"),
            Err(TimestampError::InvalidValue("seconds", _))
        ));
        assert_eq!(
            timestamp_to_seconds("01:75"),
            Err(TimestampError::SecondsOutOfRange(75))
        );
        assert_eq!(
            timestamp_to_seconds("99999:00"),
            Err(TimestampError::ExceedsMaxDuration)
        );
    }

    #[test]
    fn test_round_trip() {
        for ts in ["00:00", "00:59", "01:05", "10:30", "59:59", "99:00", "120:15"] {
            let secs = timestamp_to_seconds(ts).unwrap();
            assert_eq!(seconds_to_timestamp(secs), ts);
        }
    }

    #[test]
    fn test_parse_clip_time() {
        assert_eq!(parse_clip_time("65").unwrap(), 65);
        assert_eq!(parse_clip_time("1:05").unwrap(), 65);
        assert_eq!(parse_clip_time("0").unwrap(), 0);
        assert!(parse_clip_time("").is_err());
        assert!(parse_clip_time("-5").is_err());
        assert!(parse_clip_time("abc").is_err());
        assert!(parse_clip_time("100000").is_err());
    }

    #[test]
    fn test_parse_iso8601_duration() {
        assert_eq!(parse_iso8601_duration("PT5M0S"), Some(300));
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
        assert_eq!(parse_iso8601_duration("PT2H"), Some(7200));
        assert_eq!(parse_iso8601_duration("P1DT1S"), Some(86_401));
        assert_eq!(parse_iso8601_duration("PT1.5S"), Some(1));
        assert_eq!(parse_iso8601_duration("P"), None);
        assert_eq!(parse_iso8601_duration("5:00"), None);
        assert_eq!(parse_iso8601_duration(""), None);
    }

    #[test]
    fn test_format_iso8601_duration() {
        assert_eq!(format_iso8601_duration(300), "PT5M0S");
        assert_eq!(format_iso8601_duration(3723), "PT1H2M3S");
        assert_eq!(parse_iso8601_duration(&format_iso8601_duration(4000)), Some(4000));
    }
}
