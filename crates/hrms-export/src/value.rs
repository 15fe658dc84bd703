/*!
# Record & Value Model

Records are open key/value bags as delivered by the HR backend. They are
represented as ordered `serde_json` maps so column order survives from the
payload into identity-mode exports.

A projected field is an [`ExportValue`]: `None` when a path did not resolve
(the value is "undefined"), `Some(Value::Null)` when the payload held an
explicit null. Both render as an empty cell.
*/

use serde_json::{Map, Number, Value};

/// One exportable row
pub type Record = Map<String, Value>;

/// Result of projecting one field of one record
pub type ExportValue = Option<Value>;

/// Separator for nested paths such as `manager.email`
pub const PATH_SEPARATOR: char = '.';

/// Look up `path` in `record`.
///
/// Dotted paths walk nested objects one segment at a time. A missing segment,
/// or a segment applied to something that is not an object, short-circuits to
/// `None` instead of failing.
pub fn resolve_path(record: &Record, path: &str) -> ExportValue {
    if !path.contains(PATH_SEPARATOR) {
        return record.get(path).cloned();
    }

    let mut segments = path.split(PATH_SEPARATOR);
    let first = segments.next()?;
    let mut current = record.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current.clone())
}

/// Canonical display string for a projected value.
///
/// Undefined and null both become the empty string, never the literal text
/// `undefined` or `null`.
pub fn export_value_to_string(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(value) => value_to_string(value),
    }
}

/// Canonical display string for a JSON value
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // -0.0 prints as 0
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Whether a value counts as "nothing to show" for formatters that fall back
/// to a default (missing, null or empty string).
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
