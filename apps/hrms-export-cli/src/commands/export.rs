use crate::config::ExportJobConfig;
use crate::error::CliResult;
use crate::loader::load_records;
use chrono::Local;
use hrms_export::{DirectorySink, ExportSummary, Exporter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Export records through a job definition into `output_dir`
pub fn execute(
    job: PathBuf,
    input: PathBuf,
    output_dir: PathBuf,
    date_suffix: bool,
) -> CliResult<()> {
    println!("Job: {}", job.display());
    println!("Input: {}", input.display());
    println!("Output directory: {}", output_dir.display());

    let summary = run(&job, &input, &output_dir, date_suffix)?;

    if summary.rows == 0 {
        println!("⚠️  No records found, the exported file has no rows");
    }
    println!(
        "✅ Exported {} records to {} ({} bytes)",
        summary.rows,
        output_dir.join(&summary.filename).display(),
        summary.bytes
    );

    Ok(())
}

pub(crate) fn run(
    job: &Path,
    input: &Path,
    output_dir: &Path,
    date_suffix: bool,
) -> CliResult<ExportSummary> {
    let config = ExportJobConfig::load(job)?;
    let records = load_records(input)?;
    debug!(records = records.len(), "loaded input records");

    let filename = if date_suffix {
        format!("{}-{}", config.filename, Local::now().format("%Y-%m-%d"))
    } else {
        config.filename.clone()
    };

    let exporter = Exporter::with_options(config.export_options());
    let mapping = config.field_mapping();
    let mut sink = DirectorySink::new(output_dir);

    let summary = exporter.export_to_excel_csv(&records, &filename, mapping.as_ref(), &mut sink)?;
    Ok(summary)
}
