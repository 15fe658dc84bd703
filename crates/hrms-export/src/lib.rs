/*!
# HRMS Tabular Export

This crate turns in-memory HR records (employees, attendance, audit logs, ...)
into spreadsheet-importable CSV artifacts.

## Pipeline

1. **Project**: a [`FieldMapping`] picks and orders the exported columns.
   Each column reads a key, a dotted path (`performedBy.email`) or a
   formatter closure.
2. **Serialize**: projected rows become comma-delimited, `\n`-joined text
   with quoting for fields containing `,`, `"` or a line feed.
3. **Package**: the text is BOM-prefixed UTF-8 with MIME type
   `text/csv;charset=utf-8` and a `.csv` filename.
4. **Deliver**: an [`ArtifactSink`] receives the finished artifact.

Missing data never raises: unresolvable paths, nulls and bad timestamps all
render as empty (or raw) text.

## Usage

```rust
use hrms_export::{export_to_excel_csv, format_timestamp, ExportArtifact, FieldMapping, Record};
use serde_json::{json, Value};

fn example(records: &[Record]) -> hrms_export::ExportResult<()> {
    let mapping = FieldMapping::new()
        .with_formatter("Timestamp", |log| {
            Value::String(format_timestamp(log.get("performedAt").unwrap_or(&Value::Null)))
        })
        .with_path("Action Type", "actionType")
        .with_formatter("Performed By", |log| {
            log.get("performedBy")
                .and_then(|p| p.get("email"))
                .cloned()
                .unwrap_or_else(|| json!("System"))
        });

    let mut downloads: Vec<ExportArtifact> = Vec::new();
    export_to_excel_csv(records, "audit-logs", Some(&mapping), &mut downloads)?;
    Ok(())
}
```
*/

pub mod artifact;
pub mod config;
pub mod errors;
pub mod export;
pub mod format;
pub mod mapping;
pub mod serialize;
pub mod sink;
pub mod value;

// Re-export main types for convenience
pub use artifact::{
    build_downloadable_artifact, normalize_filename, ExportArtifact, BOM, CSV_MIME_TYPE,
};
pub use config::{ExportOptions, DEFAULT_TIMESTAMP_PATTERN};
pub use errors::{ExportError, ExportResult};
pub use export::{export_to_csv, export_to_excel_csv, ExportSummary, Exporter};
pub use format::{
    clean_text, format_boolean, format_boolean_value, format_datetime, format_timestamp,
    format_timestamp_in,
};
pub use mapping::{project_fields, FieldMapping, FieldSource, Formatter, ProjectedRecord};
pub use serialize::{convert_to_csv, escape_field, serialize_to_csv};
pub use sink::{ArtifactSink, DirectorySink};
pub use value::{resolve_path, value_to_string, ExportValue, Record};
