//! Timestamp normalisation.
//!
//! Both inventories are compared in whole epoch seconds. A missing or
//! unparsable timestamp compares as epoch 0.

use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp as reported by the remote store or by `git log --format=%cI`.
///
/// Accepts RFC 3339 with an offset, or a naive date-time which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Convert filesystem metadata time into a timezone-aware timestamp.
pub fn from_system_time(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// Whole seconds since the Unix epoch, `0` when absent.
pub fn epoch_seconds(ts: Option<&DateTime<Utc>>) -> i64 {
    ts.map_or(0, DateTime::timestamp)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn rfc3339_with_offset_is_normalised_to_utc() {
        let ts = parse_timestamp("2024-03-01T12:00:00+02:00").expect("parse");
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn naive_timestamp_is_taken_as_utc() {
        let ts = parse_timestamp("2024-03-01T12:00:00.123456").expect("parse");
        assert_eq!(ts.timestamp(), 1_709_294_400);
        let spaced = parse_timestamp("2024-03-01 12:00:00").expect("parse");
        assert_eq!(spaced.timestamp(), 1_709_294_400);
    }

    #[test]
    fn garbage_and_empty_do_not_parse() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45T99:00:00Z").is_none());
    }

    #[test]
    fn absent_timestamp_is_epoch_zero() {
        assert_eq!(epoch_seconds(None), 0);
        let ts = from_system_time(UNIX_EPOCH + Duration::from_secs(100));
        assert_eq!(epoch_seconds(Some(&ts)), 100);
    }
}
