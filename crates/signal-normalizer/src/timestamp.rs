//! Torque Timestamp Parsing

use chrono::NaiveDateTime;

/// Datetime layouts seen in Torque exports, tried in order.
/// The first two match the device clock ("24-Oct.-2024 10:30:45.123").
const DATETIME_FORMATS: &[&str] = &[
    "%d-%b.-%Y %H:%M:%S%.f",
    "%d-%b.-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M:%S%.f",
    "%d-%b-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse one timestamp cell into absolute seconds on an arbitrary epoch.
///
/// Only differences between cells matter downstream; the normalizer
/// rebases onto seconds-from-start. Returns `None` when the cell holds
/// nothing recognizable.
pub(crate) fn parse_timestamp(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis() as f64 / 1000.0);
        }
    }

    if let Some(seconds) = parse_gps_weekday_form(raw) {
        return Some(seconds);
    }

    // Some exports log a bare seconds offset
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// GPS clock form: "Thu Oct 24 10:30:45 GMT+01:00 2024".
///
/// The zone token is dropped; a log keeps one zone throughout, and the
/// axis is relative.
fn parse_gps_weekday_form(raw: &str) -> Option<f64> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() != 6 {
        return None;
    }

    let rejoined = format!("{} {} {} {}", tokens[1], tokens[2], tokens[3], tokens[5]);
    NaiveDateTime::parse_from_str(&rejoined, "%b %d %H:%M:%S %Y")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis() as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_time_with_millis() {
        let t0 = parse_timestamp("24-Oct.-2024 10:30:45.123").unwrap();
        let t1 = parse_timestamp("24-Oct.-2024 10:30:46.123").unwrap();
        assert!((t1 - t0 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_device_time_without_millis() {
        assert!(parse_timestamp("24-Oct.-2024 10:30:45").is_some());
        assert!(parse_timestamp("24-Oct-2024 10:30:45").is_some());
    }

    #[test]
    fn test_iso_like() {
        let t0 = parse_timestamp("2024-10-24 10:30:45").unwrap();
        let t1 = parse_timestamp("2024-10-24 10:30:45.500").unwrap();
        assert!((t1 - t0 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gps_weekday_form() {
        let t0 = parse_timestamp("Thu Oct 24 10:30:45 GMT+01:00 2024").unwrap();
        let t1 = parse_timestamp("Thu Oct 24 10:30:47 GMT+01:00 2024").unwrap();
        assert!((t1 - t0 - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_bare_seconds() {
        assert_eq!(parse_timestamp("12.5"), Some(12.5));
        assert_eq!(parse_timestamp(" 0 "), Some(0.0));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("-").is_none());
        assert!(parse_timestamp("not a time").is_none());
        assert!(parse_timestamp("NaN").is_none());
    }
}
