//! Date extraction for index pages.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Interpret a metadata value as a date.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD HH:MM:SS` strings. Naive forms are taken as UTC.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// First resolvable date among `values`, in order
pub fn first_date<'a, I>(values: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    values.into_iter().flatten().find_map(parse_date)
}

/// Render a date the way index records store it (`2024-05-01T00:00:00.000Z`)
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
