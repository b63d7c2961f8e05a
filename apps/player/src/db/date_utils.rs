//! Timestamp encoding for stored history rows.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a completion time the way exported history files carry it.
pub fn format_utc(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a stored RFC 3339 timestamp back into UTC.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|value| value.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_trips_whole_seconds() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(format_utc(at), "2024-05-06T07:08:09Z");
        assert_eq!(parse_utc("2024-05-06T07:08:09Z"), Some(at));
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let parsed = parse_utc("2024-05-06T09:08:09+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(parse_utc("yesterday"), None);
    }
}
