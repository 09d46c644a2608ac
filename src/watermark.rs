use chrono::{DateTime, NaiveDateTime};

/// Formats accepted for a stored watermark, tried in order after RFC 3339.
/// Jira emits colon-less offsets (`+0000`); the last two cover values that
/// were already rendered to the JQL literal shape.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Normalize a stored watermark into the `YYYY-MM-DD HH:MM` JQL date literal.
///
/// `None` in means `None` out (full-load path). The wall-clock time is kept as
/// given: seconds, sub-seconds, and any timezone annotation are dropped, not
/// converted. A value that fails every parse attempt degrades to `None` with a
/// warning — a malformed watermark means a full load, never a crash.
pub fn format_watermark(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    match parse_timestamp(raw) {
        Some(ts) => Some(ts.format("%Y-%m-%d %H:%M").to_string()),
        None => {
            tracing::warn!(value = %raw, "unparseable watermark, falling back to full load");
            None
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    // Zulu suffix → explicit zero offset
    let normalized = if let Some(stripped) = raw.strip_suffix('Z') {
        format!("{stripped}+00:00")
    } else {
        raw.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(dt);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_watermark_stays_absent() {
        assert_eq!(format_watermark(None), None);
    }

    #[test]
    fn zulu_suffix_formats_to_minute_precision() {
        assert_eq!(
            format_watermark(Some("2024-01-05T10:15:30Z")).as_deref(),
            Some("2024-01-05 10:15")
        );
    }

    #[test]
    fn explicit_offset_keeps_wall_clock_time() {
        assert_eq!(
            format_watermark(Some("2024-01-05T10:15:30+02:00")).as_deref(),
            Some("2024-01-05 10:15")
        );
    }

    #[test]
    fn jira_colonless_offset_parses() {
        assert_eq!(
            format_watermark(Some("2024-01-05T10:15:30.000+0000")).as_deref(),
            Some("2024-01-05 10:15")
        );
    }

    #[test]
    fn subseconds_are_discarded() {
        assert_eq!(
            format_watermark(Some("2024-01-05T10:15:30.987654Z")).as_deref(),
            Some("2024-01-05 10:15")
        );
    }

    #[test]
    fn already_formatted_value_passes_through() {
        assert_eq!(
            format_watermark(Some("2024-03-01 00:00")).as_deref(),
            Some("2024-03-01 00:00")
        );
    }

    #[test]
    fn second_precision_value_is_truncated() {
        assert_eq!(
            format_watermark(Some("2024-03-01 12:34:56")).as_deref(),
            Some("2024-03-01 12:34")
        );
    }

    #[test]
    fn garbage_degrades_to_none() {
        assert_eq!(format_watermark(Some("not-a-date")), None);
    }

    #[test]
    fn empty_string_degrades_to_none() {
        assert_eq!(format_watermark(Some("")), None);
    }
}
