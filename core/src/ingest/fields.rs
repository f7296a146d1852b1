use crate::model::StructureType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a numeric cell, falling back to `default` when the cell is absent,
/// blank, unparseable or not finite.
pub fn number_or(cell: Option<&str>, default: f64) -> f64 {
    cell.and_then(parse_finite).unwrap_or(default)
}

pub fn parse_finite(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Returns the trimmed cell, or `default` when it is absent or blank.
pub fn text_or(cell: Option<&str>, default: &str) -> String {
    match cell.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

pub fn structure_or_default(cell: Option<&str>) -> StructureType {
    cell.and_then(StructureType::parse).unwrap_or_default()
}

/// Keeps a parseable ISO-8601 timestamp verbatim, otherwise stamps the
/// capture time.
pub fn timestamp_or(cell: Option<&str>, captured_at: DateTime<Utc>) -> String {
    match cell.map(str::trim) {
        Some(text) if is_iso8601(text) => text.to_string(),
        _ => format_timestamp(captured_at),
    }
}

/// Full RFC 3339, a zone-less date-time (`T` or space separated) or a bare date.
fn is_iso8601(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NAIVE_DATE_TIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok())
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn number_or_keeps_genuine_zero() {
        assert_eq!(number_or(Some("0"), 4000.0), 0.0);
        assert_eq!(number_or(Some(" 12.5 "), 0.0), 12.5);
    }

    #[test]
    fn number_or_falls_back_on_garbage() {
        assert_eq!(number_or(None, 4000.0), 4000.0);
        assert_eq!(number_or(Some(""), 4000.0), 4000.0);
        assert_eq!(number_or(Some("abc"), 40.0), 40.0);
        assert_eq!(number_or(Some("NaN"), 40.0), 40.0);
        assert_eq!(number_or(Some("inf"), 40.0), 40.0);
    }

    #[test]
    fn timestamp_or_replaces_unparseable_values() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            timestamp_or(Some("2023-05-01T08:30:00Z"), at),
            "2023-05-01T08:30:00Z"
        );
        assert_eq!(timestamp_or(Some("yesterday"), at), "2024-03-01T12:00:00.000Z");
        assert_eq!(timestamp_or(None, at), "2024-03-01T12:00:00.000Z");
    }

    #[test]
    fn timestamp_or_keeps_zoneless_and_date_only_values() {
        let at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(timestamp_or(Some("2024-05-02"), at), "2024-05-02");
        assert_eq!(
            timestamp_or(Some("2024-05-02T10:00:00"), at),
            "2024-05-02T10:00:00"
        );
        assert_eq!(
            timestamp_or(Some("2024-05-02 10:00:00.250"), at),
            "2024-05-02 10:00:00.250"
        );
        assert_eq!(timestamp_or(Some("2024-13-40"), at), "2030-01-01T00:00:00.000Z");
    }
}
