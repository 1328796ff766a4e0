//! Date header formatting and parsing (RFC 2822).

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Utc};

/// Formats a timestamp for a `Date`-style header.
///
/// Fractional seconds are dropped.
///
/// # Errors
///
/// Returns an error if the year is outside 0..=9999, which RFC 2822
/// cannot express.
pub fn format_date(date: &DateTime<Utc>) -> Result<String> {
    if !(0..=9999).contains(&date.year()) {
        return Err(Error::InvalidDate(format!(
            "{date} is outside the RFC 2822 year range"
        )));
    }
    Ok(date.to_rfc2822())
}

/// Parses a `Date`-style header value.
///
/// RFC 2822 is expected; RFC 3339 is accepted as a fallback for values
/// written by other tools.
///
/// # Errors
///
/// Returns an error if the value matches neither format.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| Error::InvalidDate(format!("{value}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2012, 3, 3, 3, 3, 3).unwrap();
        assert_eq!(format_date(&date).unwrap(), "Sat, 3 Mar 2012 03:03:03 +0000");
    }

    #[test]
    fn test_parse_date_normalizes_offset() {
        let date = parse_date("Sat, 3 Mar 2012 05:03:03 +0200").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2012, 3, 3, 3, 3, 3).unwrap());
    }

    #[test]
    fn test_parse_date_rfc3339_fallback() {
        let date = parse_date("2012-03-03T04:04:04Z").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2012, 3, 3, 4, 4, 4).unwrap());
    }

    #[test]
    fn test_format_date_year_range() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(format_date(&far), Err(Error::InvalidDate(_))));

        let early = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date(&format_date(&early).unwrap()).unwrap(), early);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(matches!(parse_date("yesterday"), Err(Error::InvalidDate(_))));
    }
}
