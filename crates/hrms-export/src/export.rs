/*!
# Export Orchestration

Glues projection, serialization and artifact building together and hands
the result to an [`ArtifactSink`]. Every call builds its document from
scratch; nothing is cached between exports.
*/

use crate::artifact::{normalize_filename, ExportArtifact};
use crate::config::ExportOptions;
use crate::errors::ExportResult;
use crate::format::format_timestamp_in;
use crate::mapping::{project_fields, FieldMapping};
use crate::serialize::{convert_to_csv, serialize_to_csv};
use crate::sink::ArtifactSink;
use crate::value::Record;
use chrono::Local;
use serde_json::Value;
use tracing::{info, warn};

/// What an export delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub filename: String,
    pub rows: usize,
    pub bytes: usize,
}

/// Runs exports with a fixed set of [`ExportOptions`]
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Format a timestamp in local time using the configured pattern
    pub fn format_timestamp(&self, value: &Value) -> String {
        format_timestamp_in(value, &Local, &self.options.timestamp_pattern)
    }

    /// Serialize raw records and deliver them under `filename` as given
    pub fn export_to_csv<S: ArtifactSink + ?Sized>(
        &self,
        records: &[Record],
        filename: &str,
        headers: Option<&[String]>,
        sink: &mut S,
    ) -> ExportResult<ExportSummary> {
        let csv = convert_to_csv(records, headers);
        self.deliver(&csv, filename, records.len(), sink)
    }

    /// Project through `mapping` (when given), normalize the filename and
    /// deliver a spreadsheet-friendly artifact
    pub fn export_to_excel_csv<S: ArtifactSink + ?Sized>(
        &self,
        records: &[Record],
        filename: &str,
        mapping: Option<&FieldMapping>,
        sink: &mut S,
    ) -> ExportResult<ExportSummary> {
        let filename = normalize_filename(filename);
        let csv = match mapping {
            Some(mapping) => {
                let projected = project_fields(records, Some(mapping));
                serialize_to_csv(&projected, Some(mapping.headers().as_slice()))
            }
            None => convert_to_csv(records, None),
        };
        self.deliver(&csv, &filename, records.len(), sink)
    }

    fn deliver<S: ArtifactSink + ?Sized>(
        &self,
        csv: &str,
        filename: &str,
        rows: usize,
        sink: &mut S,
    ) -> ExportResult<ExportSummary> {
        if rows == 0 {
            warn!(filename, "exporting an empty record collection");
        }

        let artifact = if self.options.include_bom {
            ExportArtifact::new(csv, filename)
        } else {
            ExportArtifact::without_bom(csv, filename)
        };
        sink.deliver(&artifact)?;

        info!(filename, rows, bytes = artifact.len(), "export delivered");
        Ok(ExportSummary {
            filename: artifact.filename,
            rows,
            bytes: artifact.bytes.len(),
        })
    }
}

/// [`Exporter::export_to_csv`] with default options
pub fn export_to_csv<S: ArtifactSink + ?Sized>(
    records: &[Record],
    filename: &str,
    headers: Option<&[String]>,
    sink: &mut S,
) -> ExportResult<ExportSummary> {
    Exporter::new().export_to_csv(records, filename, headers, sink)
}

/// [`Exporter::export_to_excel_csv`] with default options
pub fn export_to_excel_csv<S: ArtifactSink + ?Sized>(
    records: &[Record],
    filename: &str,
    mapping: Option<&FieldMapping>,
    sink: &mut S,
) -> ExportResult<ExportSummary> {
    Exporter::new().export_to_excel_csv(records, filename, mapping, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::BOM;
    use crate::errors::ExportError;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn text(artifact: &ExportArtifact) -> String {
        String::from_utf8(artifact.bytes.clone()).unwrap()
    }

    struct FailingSink;

    impl ArtifactSink for FailingSink {
        fn deliver(&mut self, _artifact: &ExportArtifact) -> ExportResult<()> {
            Err(ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "download blocked",
            )))
        }
    }

    #[test]
    fn test_excel_export_normalizes_filename_and_projects() {
        let records = vec![record(json!({"name": "Ann", "dept": {"name": "HR"}}))];
        let mapping = FieldMapping::new()
            .with_path("Name", "name")
            .with_path("Department", "dept.name");
        let mut sink: Vec<ExportArtifact> = Vec::new();

        let summary = export_to_excel_csv(&records, "employees", Some(&mapping), &mut sink).unwrap();

        assert_eq!(summary.filename, "employees.csv");
        assert_eq!(summary.rows, 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(text(&sink[0]), format!("{}Name,Department\nAnn,HR", BOM));
        assert_eq!(summary.bytes, sink[0].bytes.len());
    }

    #[test]
    fn test_excel_export_without_mapping_is_identity() {
        let records = vec![record(json!({"id": 7, "code": "A,1"}))];
        let mut sink: Vec<ExportArtifact> = Vec::new();

        export_to_excel_csv(&records, "codes.csv", None, &mut sink).unwrap();

        assert_eq!(sink[0].filename, "codes.csv");
        assert_eq!(text(&sink[0]), format!("{}id,code\n7,\"A,1\"", BOM));
    }

    #[test]
    fn test_plain_export_keeps_filename() {
        let records = vec![record(json!({"a": 1}))];
        let mut sink: Vec<ExportArtifact> = Vec::new();

        export_to_csv(&records, "raw", None, &mut sink).unwrap();
        assert_eq!(sink[0].filename, "raw");
    }

    #[test]
    fn test_empty_export_still_delivers_bom_only_artifact() {
        let mut sink: Vec<ExportArtifact> = Vec::new();
        let summary = export_to_excel_csv(&[], "empty", None, &mut sink).unwrap();

        assert_eq!(summary.rows, 0);
        assert_eq!(sink[0].bytes, vec![0xEF, 0xBB, 0xBF]);
    }

    #[test]
    fn test_exporter_without_bom() {
        let exporter = Exporter::with_options(ExportOptions {
            include_bom: false,
            ..Default::default()
        });
        let records = vec![record(json!({"a": 1}))];
        let mut sink: Vec<ExportArtifact> = Vec::new();

        exporter
            .export_to_excel_csv(&records, "plain", None, &mut sink)
            .unwrap();
        assert_eq!(text(&sink[0]), "a\n1");
    }

    #[test]
    fn test_exporter_timestamp_pattern() {
        let exporter = Exporter::with_options(ExportOptions {
            timestamp_pattern: "%d/%m/%Y".to_string(),
            ..Default::default()
        });
        assert_eq!(exporter.format_timestamp(&json!("2024-03-05T12:00:00")), "05/03/2024");
        assert_eq!(exporter.format_timestamp(&Value::Null), "");
    }

    #[test]
    fn test_sink_failure_is_surfaced() {
        let records = vec![record(json!({"a": 1}))];
        let result = export_to_excel_csv(&records, "x", None, &mut FailingSink);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_repeated_exports_are_independent() {
        let mut sink: Vec<ExportArtifact> = Vec::new();
        let first = vec![record(json!({"a": 1}))];
        let second = vec![record(json!({"b": 2}))];

        export_to_excel_csv(&first, "x", None, &mut sink).unwrap();
        export_to_excel_csv(&second, "x", None, &mut sink).unwrap();

        assert_eq!(text(&sink[0]), format!("{}a\n1", BOM));
        assert_eq!(text(&sink[1]), format!("{}b\n2", BOM));
    }
}
