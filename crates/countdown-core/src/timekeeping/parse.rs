//! Timestamp parsing.
//!
//! Records store their target as free-form text. Parsing is strict: anything
//! that is not one of the accepted shapes is an error instead of a silently
//! expired countdown.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::TimeError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp into an absolute instant.
///
/// Accepted forms:
/// - RFC 3339 with any offset (`2099-01-01T00:00:00Z`)
/// - RFC 2822 (`Thu, 01 Jan 2099 00:00:00 +0000`)
/// - date and time without offset, read as local wall-clock time
/// - date only, read as UTC midnight
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimeError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(TimeError::Unparseable(input.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(naive, input);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(TimeError::Unparseable(input.to_string()))
}

/// Resolve a local wall-clock time. Ambiguous times (DST fold) take the
/// earlier instant.
pub(crate) fn local_to_utc(naive: NaiveDateTime, input: &str) -> Result<DateTime<Utc>, TimeError> {
    match chrono::Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(TimeError::NonexistentLocalTime(input.to_string())),
    }
}
