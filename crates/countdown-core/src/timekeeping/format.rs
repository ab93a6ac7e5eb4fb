use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

/// Render `at` in the local time zone with a strftime pattern.
///
/// An invalid pattern falls back to RFC 3339 instead of panicking inside
/// `Display`.
pub fn format_local(at: DateTime<Utc>, pattern: &str) -> String {
    let local = at.with_timezone(&Local);
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        tracing::warn!(pattern, "invalid date format, using RFC 3339");
        return local.to_rfc3339();
    }
    local.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_pattern() {
        let at = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(format_local(at, "%Y"), "2030");
    }

    #[test]
    fn invalid_pattern_falls_back() {
        let at = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        let out = format_local(at, "%Q nonsense %");
        assert!(out.starts_with("2030-06-0"));
    }
}
