/*!
# CSV Serialization

Renders projected records as comma-delimited, `\n`-joined text. Fields that
contain a comma, a double quote or a line feed are quoted with inner quotes
doubled; everything else is written as-is.
*/

use crate::mapping::{project_fields, ProjectedRecord};
use crate::value::{export_value_to_string, Record};
use std::borrow::Cow;
use tracing::debug;

pub const FIELD_DELIMITER: char = ',';
pub const LINE_DELIMITER: char = '\n';
pub const QUOTE: char = '"';

/// Quote a single field when it contains a delimiter, quote or line feed
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains([FIELD_DELIMITER, QUOTE, LINE_DELIMITER]) {
        return Cow::Borrowed(field);
    }

    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            escaped.push(QUOTE);
        }
        escaped.push(c);
    }
    escaped.push(QUOTE);
    Cow::Owned(escaped)
}

/// Serialize projected records under `headers`.
///
/// With `headers` absent the columns of the first record are used. An empty
/// record slice yields an empty string. No trailing newline is written.
pub fn serialize_to_csv(records: &[ProjectedRecord], headers: Option<&[String]>) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };

    let inferred: Vec<String>;
    let headers = match headers {
        Some(headers) => headers,
        None => {
            inferred = first.columns().map(str::to_string).collect();
            inferred.as_slice()
        }
    };

    let mut csv = join_fields(headers.iter().map(|h| escape_field(h)));
    for record in records {
        csv.push(LINE_DELIMITER);
        csv.push_str(&join_fields(headers.iter().map(|header| {
            escape_field(&export_value_to_string(record.get(header))).into_owned()
        })));
    }

    debug!(
        rows = records.len(),
        columns = headers.len(),
        bytes = csv.len(),
        "serialized csv"
    );
    csv
}

/// Serialize raw records without a field mapping.
///
/// Columns are `headers` when given, otherwise the keys of the first record,
/// looked up directly on every record.
pub fn convert_to_csv(records: &[Record], headers: Option<&[String]>) -> String {
    match headers {
        Some(headers) => {
            let projected: Vec<ProjectedRecord> = records
                .iter()
                .map(|record| ProjectedRecord::from(record.clone()))
                .collect();
            serialize_to_csv(&projected, Some(headers))
        }
        None => serialize_to_csv(&project_fields(records, None), None),
    }
}

fn join_fields<S: AsRef<str>>(fields: impl Iterator<Item = S>) -> String {
    let mut line = String::new();
    for (i, field) in fields.enumerate() {
        if i > 0 {
            line.push(FIELD_DELIMITER);
        }
        line.push_str(field.as_ref());
    }
    line
}
