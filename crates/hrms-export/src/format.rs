/*!
# Cell Formatters

Helpers that formatter closures use to turn raw payload values into display
text. None of them fail: bad input falls back to an empty string or to the
input's own string form.
*/

use crate::config::DEFAULT_TIMESTAMP_PATTERN;
use crate::value::value_to_string;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;
use std::fmt::{Display, Write as _};
use std::sync::LazyLock;

/// Naive layouts accepted in addition to RFC 3339; read as local time
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Format a timestamp-like value in the host's local time zone using the
/// default `YYYY-MM-DD HH:mm:ss` layout.
pub fn format_timestamp(value: &Value) -> String {
    format_timestamp_in(value, &Local, DEFAULT_TIMESTAMP_PATTERN)
}

/// Format a timestamp-like value in `tz` using `pattern`.
///
/// Strings are parsed as RFC 3339, naive ISO date-times (local to `tz`) or
/// bare dates (UTC midnight). Numbers are epoch milliseconds. Empty input
/// gives `""`; unparseable input is returned as its string form.
pub fn format_timestamp_in<Tz>(value: &Value, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if is_falsy(value) {
        return String::new();
    }

    let parsed = match value {
        Value::String(s) => parse_timestamp(s, tz),
        Value::Number(n) => n
            .as_f64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms as i64).single())
            .map(|dt| dt.with_timezone(tz)),
        _ => None,
    };

    match parsed {
        Some(dt) => format_datetime(&dt, pattern),
        None => value_to_string(value),
    }
}

/// Format an already-typed date value.
///
/// An invalid `pattern` falls back to the default layout.
pub fn format_datetime<Tz>(dt: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    if write!(out, "{}", dt.format(pattern)).is_ok() {
        return out;
    }
    dt.format(DEFAULT_TIMESTAMP_PATTERN).to_string()
}

/// Parse a timestamp string into `tz`
pub fn parse_timestamp<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return from_local_or_shifted(tz, &naive);
        }
    }

    let date = NaiveDate::parse_from_str(s, DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(tz))
}

/// Place a naive local time in `tz`.
///
/// A time inside a spring-forward gap is read with the offset in force
/// before the gap, which moves it forward by the gap's length.
fn from_local_or_shifted<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    if let Some(dt) = tz.from_local_datetime(naive).earliest() {
        return Some(dt);
    }

    let before = tz
        .from_local_datetime(&(*naive - Duration::days(1)))
        .earliest()?;
    let offset = before.offset().fix();
    let utc = *naive - Duration::seconds(i64::from(offset.local_minus_utc()));
    Some(tz.from_utc_datetime(&utc))
}

/// `Yes` / `No`, or `""` when the value is absent
pub fn format_boolean(value: Option<bool>) -> String {
    match value {
        None => String::new(),
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
    }
}

/// [`format_boolean`] for a payload value; anything but a bool renders empty
pub fn format_boolean_value(value: &Value) -> String {
    format_boolean(value.as_bool())
}

/// Strip HTML tags, collapse whitespace and trim
pub fn clean_text(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let stripped = HTML_TAG.replace_all(text, "");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}
