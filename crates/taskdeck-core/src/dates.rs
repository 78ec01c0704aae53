//! Deadline parsing.
//!
//! Accepts:
//! - RFC 3339 with timezone: `2026-01-15T10:30:00Z`
//! - ISO 8601 without timezone (assumes UTC): `2026-01-15T10:30:00`
//! - Date only (assumes midnight UTC): `2026-01-15`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a client-supplied deadline.
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("deadline cannot be empty".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(format!(
        "Invalid deadline '{}'. Expected a date (2026-01-15) or RFC 3339 timestamp (2026-01-15T10:30:00Z)",
        s
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_date_only_is_midnight_utc() {
        let dt = parse_deadline("2026-03-04").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2026, 3, 4));
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn test_rfc3339_with_offset_is_converted() {
        let dt = parse_deadline("2026-03-04T10:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_naive_timestamp_assumes_utc() {
        let dt = parse_deadline("2026-03-04T10:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_deadline("next tuesday").is_err());
        assert!(parse_deadline("   ").is_err());
        assert!(parse_deadline("2026-13-45").is_err());
    }
}
