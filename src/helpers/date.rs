//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a post date string in the formats found in front matter and the posts index
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Format a date for display, like "January 5, 2024".
///
/// Strings that cannot be parsed are returned unchanged.
pub fn long_date(s: &str) -> String {
    match parse_date(s) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => s.to_string(),
    }
}

/// Today's date in `YYYY-MM-DD` form
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_date("2024-01-15"), Some(expected));
        assert_eq!(parse_date("2024/01/15"), Some(expected));
        assert!(parse_date("2024-01-15 10:30:00").is_some());
        assert!(parse_date("2024-01-15T10:30:00Z").is_some());
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date("2024-01-05"), "January 5, 2024");
        assert_eq!(long_date("2023-12-31 08:00:00"), "December 31, 2023");
        assert_eq!(long_date("someday"), "someday");
    }

    #[test]
    fn test_today_shape() {
        let today = today();
        assert_eq!(today.len(), 10);
        assert!(parse_date(&today).is_some());
    }
}
