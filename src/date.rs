//! W3C datetime codec for `<lastmod>` values
//!
//! Sitemaps use a subset of ISO 8601 described in the W3C datetime note.
//! Parsing accepts every precision the note allows (year, month, day,
//! minutes, seconds, fractions); formatting always writes whole seconds in UTC.
//!
//! Reference: https://www.w3.org/TR/NOTE-datetime

use crate::{Result, SitemapError};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

/// Parse a W3C datetime
///
/// Accepted forms, tried in this order:
/// - `YYYY` (January 1st, local midnight)
/// - `YYYY-MM` (first of the month, local midnight)
/// - `YYYY-MM-DD` (local midnight)
/// - `YYYY-MM-DDThh:mm[:ss[.fraction]](Z|+hh:mm|-hh:mm)`
///
/// Fractional seconds keep millisecond precision. Anything else fails with
/// [`SitemapError::InvalidDateFormat`].
///
/// # Examples
///
/// ```
/// use static_sitemap::parse_w3c;
///
/// let dt = parse_w3c("2024-03-05T10:20:30+02:00").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2024-03-05T08:20:30+00:00");
///
/// assert!(parse_w3c("5 March 2024").is_err());
/// ```
pub fn parse_w3c(text: &str) -> Result<DateTime<Utc>> {
    parse_components(text.trim())
        .ok_or_else(|| SitemapError::InvalidDateFormat(text.to_string()))
}

/// Format a timestamp as `YYYY-MM-DDThh:mm:ssZ`
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use static_sitemap::format_w3c;
///
/// let dt = Utc.with_ymd_and_hms(2024, 3, 5, 8, 20, 30).unwrap();
/// assert_eq!(format_w3c(&dt), "2024-03-05T08:20:30Z");
/// ```
pub fn format_w3c(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn parse_components(s: &str) -> Option<DateTime<Utc>> {
    let bytes = s.as_bytes();
    let year = digits(bytes, 0, 4)? as i32;

    match bytes.len() {
        4 => local_midnight(year, 1, 1),
        7 if bytes.get(4) == Some(&b'-') => local_midnight(year, digits(bytes, 5, 2)?, 1),
        10 if bytes.get(4) == Some(&b'-') && bytes.get(7) == Some(&b'-') => {
            local_midnight(year, digits(bytes, 5, 2)?, digits(bytes, 8, 2)?)
        }
        _ => parse_datetime(bytes, year),
    }
}

/// Read `len` ASCII digits starting at `start`
fn digits(bytes: &[u8], start: usize, len: usize) -> Option<u32> {
    let slice = bytes.get(start..start + len)?;
    if !slice.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(
        slice
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0')),
    )
}

fn local_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_datetime(bytes: &[u8], year: i32) -> Option<DateTime<Utc>> {
    let separators = [(4, b'-'), (7, b'-'), (10, b'T'), (13, b':')];
    if !separators
        .iter()
        .all(|(pos, sep)| bytes.get(*pos) == Some(sep))
    {
        return None;
    }

    let month = digits(bytes, 5, 2)?;
    let day = digits(bytes, 8, 2)?;
    let hour = digits(bytes, 11, 2)?;
    let minute = digits(bytes, 14, 2)?;

    let mut pos = 16;
    let mut second = 0;
    let mut millis = 0;

    if bytes.get(pos) == Some(&b':') {
        second = digits(bytes, pos + 1, 2)?;
        pos += 3;

        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            let start = pos;
            while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
                pos += 1;
            }
            if pos == start {
                return None;
            }
            // Keep milliseconds, drop the rest
            let fraction = &bytes[start..pos];
            millis = (0..3).fold(0u32, |acc, i| {
                acc * 10 + fraction.get(i).map_or(0, |d| u32::from(d - b'0'))
            });
        }
    }

    let offset_minutes = match &bytes[pos..] {
        b"Z" => 0,
        [sign @ (b'+' | b'-'), _, _, b':', _, _] => {
            let hours = i64::from(digits(bytes, pos + 1, 2)?);
            let minutes = i64::from(digits(bytes, pos + 4, 2)?);
            let total = hours * 60 + minutes;
            if *sign == b'-' { -total } else { total }
        }
        _ => return None,
    };

    let naive = NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_milli_opt(hour, minute, second, millis)?;

    Utc.from_utc_datetime(&naive)
        .checked_sub_signed(Duration::minutes(offset_minutes))
}
