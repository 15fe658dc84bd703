use crate::error::{CliError, CliResult};
use chrono::Local;
use hrms_export::{
    clean_text, format_boolean_value, format_timestamp_in, resolve_path, value::is_blank,
    value_to_string, ExportOptions, FieldMapping, FieldSource, DEFAULT_TIMESTAMP_PATTERN,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Export job file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJobConfig {
    /// Base name of the produced file (`.csv` is appended when missing)
    pub filename: String,

    /// chrono strftime pattern for `timestamp` columns
    #[serde(default = "default_timestamp_pattern")]
    pub timestamp_pattern: String,

    /// Prefix the file with a UTF-8 byte-order-mark
    #[serde(default = "default_include_bom")]
    pub include_bom: bool,

    /// Exported columns in order; empty means export every key of the
    /// first record as-is
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

/// One exported column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column header in the CSV
    pub header: String,

    /// Key or dotted path in the source record
    pub path: String,

    /// How the value is rendered
    #[serde(default)]
    pub format: ColumnFormat,

    /// Text used when the value is missing, null or empty
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    #[default]
    Text,
    Timestamp,
    Boolean,
    CleanText,
}

impl ExportJobConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.filename.trim().is_empty() {
            return Err(CliError::InvalidConfig(
                "filename must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (i, column) in self.columns.iter().enumerate() {
            if column.header.is_empty() {
                return Err(CliError::InvalidConfig(format!(
                    "column {} has an empty header",
                    i + 1
                )));
            }
            if column.path.is_empty() {
                return Err(CliError::InvalidConfig(format!(
                    "column '{}' has an empty path",
                    column.header
                )));
            }
            if !seen.insert(column.header.as_str()) {
                return Err(CliError::InvalidConfig(format!(
                    "duplicate column header '{}'",
                    column.header
                )));
            }
        }

        Ok(())
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            timestamp_pattern: self.timestamp_pattern.clone(),
            include_bom: self.include_bom,
        }
    }

    /// `None` when the job exports records as-is
    pub fn field_mapping(&self) -> Option<FieldMapping> {
        if self.columns.is_empty() {
            return None;
        }

        let mut mapping = FieldMapping::new();
        for column in &self.columns {
            mapping.insert(
                column.header.clone(),
                column.field_source(&self.timestamp_pattern),
            );
        }
        Some(mapping)
    }
}

impl ColumnConfig {
    fn field_source(&self, timestamp_pattern: &str) -> FieldSource {
        if self.format == ColumnFormat::Text && self.default.is_none() {
            return FieldSource::Path(self.path.clone());
        }

        let path = self.path.clone();
        let format = self.format;
        let default = self.default.clone();
        let pattern = timestamp_pattern.to_string();

        FieldSource::formatter(move |record| {
            let value = resolve_path(record, &path);
            let rendered = match format {
                ColumnFormat::Text if !is_blank(value.as_ref()) => {
                    return value.unwrap_or(Value::Null);
                }
                ColumnFormat::Text => String::new(),
                ColumnFormat::Timestamp => {
                    format_timestamp_in(value.as_ref().unwrap_or(&Value::Null), &Local, &pattern)
                }
                ColumnFormat::Boolean => format_boolean_value(&boolean_cell(value)),
                ColumnFormat::CleanText => match &value {
                    Some(Value::String(s)) => clean_text(Some(s.as_str())),
                    Some(other) => clean_text(Some(value_to_string(other).as_str())),
                    None => String::new(),
                },
            };

            match (&default, rendered.is_empty()) {
                (Some(default), true) => Value::String(default.clone()),
                _ => Value::String(rendered),
            }
        })
    }
}

/// CSV input carries booleans as text; `true` / `false` (any case) become
/// bools, everything else is left for the formatter to reject
fn boolean_cell(value: Option<Value>) -> Value {
    match value {
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        },
        Some(other) => other,
        None => Value::Null,
    }
}

fn default_timestamp_pattern() -> String {
    DEFAULT_TIMESTAMP_PATTERN.to_string()
}

fn default_include_bom() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_export::{project_fields, serialize_to_csv, Record};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn parse(yaml: &str) -> ExportJobConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_load_job_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "filename: employees\ncolumns:\n  - header: Name\n    path: name\n  - header: Email\n    path: contact.email"
        )
        .unwrap();

        let config = ExportJobConfig::load(file.path()).unwrap();
        assert_eq!(config.filename, "employees");
        assert_eq!(config.timestamp_pattern, DEFAULT_TIMESTAMP_PATTERN);
        assert!(config.include_bom);
        assert_eq!(config.columns.len(), 2);
        assert_eq!(config.columns[1].format, ColumnFormat::Text);
    }

    #[test]
    fn test_validation_rejects_bad_jobs() {
        let empty_name = parse("filename: ''\n");
        assert!(matches!(empty_name.validate(), Err(CliError::InvalidConfig(_))));

        let duplicate = parse(
            "filename: x\ncolumns:\n  - {header: A, path: a}\n  - {header: A, path: b}\n",
        );
        let err = duplicate.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate column header 'A'"));

        let no_path = parse("filename: x\ncolumns:\n  - {header: A, path: ''}\n");
        assert!(no_path.validate().is_err());
    }

    #[test]
    fn test_job_without_columns_is_identity() {
        let config = parse("filename: raw\n");
        assert!(config.field_mapping().is_none());
    }

    #[test]
    fn test_formatted_columns() {
        let config = parse(
            r#"
filename: audit-logs
timestamp_pattern: "%Y"
columns:
  - {header: Year, path: performedAt, format: timestamp}
  - {header: Performed By, path: performedBy.email, default: System}
  - {header: Active, path: active, format: boolean}
  - {header: Notes, path: notes, format: clean_text}
  - {header: Count, path: count}
"#,
        );
        let mapping = config.field_mapping().unwrap();
        let records = vec![
            record(json!({
                "performedAt": "2023-06-15T12:00:00",
                "performedBy": {"email": "hr@acme.io"},
                "active": true,
                "notes": "<i>late</i>   arrival",
                "count": 3
            })),
            record(json!({"performedBy": null, "active": false, "notes": null})),
        ];

        let projected = project_fields(&records, Some(&mapping));
        let csv = serialize_to_csv(&projected, Some(mapping.headers().as_slice()));
        assert_eq!(
            csv,
            "Year,Performed By,Active,Notes,Count\n2023,hr@acme.io,Yes,late arrival,3\n,System,No,,"
        );
    }

    #[test]
    fn test_boolean_column_reads_csv_text() {
        let mut input = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(input, "name,active\nAnn,false\nBo,TRUE\nCy,yes\n").unwrap();
        let records = crate::loader::load_records(input.path()).unwrap();

        let config = parse("filename: x\ncolumns:\n  - {header: Active, path: active, format: boolean}\n");
        let mapping = config.field_mapping().unwrap();
        let projected = project_fields(&records, Some(&mapping));
        let csv = serialize_to_csv(&projected, Some(mapping.headers().as_slice()));

        assert_eq!(csv, "Active\nNo\nYes\n");
    }

    #[test]
    fn test_boolean_column_leaves_non_bools_empty() {
        let config = parse(
            "filename: x\ncolumns:\n  - {header: Active, path: active, format: boolean, default: n/a}\n",
        );
        let mapping = config.field_mapping().unwrap();
        let records = vec![
            record(json!({"active": 1})),
            record(json!({"active": ""})),
            record(json!({})),
        ];
        let projected = project_fields(&records, Some(&mapping));
        for row in &projected {
            assert_eq!(row.get("Active"), Some(&json!("n/a")));
        }
    }

    #[test]
    fn test_text_default_keeps_raw_value_type() {
        let config = parse("filename: x\ncolumns:\n  - {header: N, path: n, default: none}\n");
        let mapping = config.field_mapping().unwrap();
        let projected = project_fields(&[record(json!({"n": 5})), record(json!({"n": ""}))], Some(&mapping));
        assert_eq!(projected[0].get("N"), Some(&json!(5)));
        assert_eq!(projected[1].get("N"), Some(&json!("none")));
    }

    #[test]
    fn test_export_options_follow_job() {
        let config = parse("filename: x\ninclude_bom: false\ntimestamp_pattern: '%d.%m.%Y'\n");
        let options = config.export_options();
        assert!(!options.include_bom);
        assert_eq!(options.timestamp_pattern, "%d.%m.%Y");
    }
}
