use crate::config::ExportJobConfig;
use crate::error::CliResult;
use crate::loader::load_records;
use hrms_export::{convert_to_csv, project_fields, serialize_to_csv};
use std::path::{Path, PathBuf};

/// Print the CSV a job would produce for the first `limit` records
pub fn execute(job: PathBuf, input: PathBuf, limit: usize) -> CliResult<()> {
    let csv = render(&job, &input, limit)?;
    if csv.is_empty() {
        println!("(no records)");
    } else {
        println!("{}", csv);
    }
    Ok(())
}

pub(crate) fn render(job: &Path, input: &Path, limit: usize) -> CliResult<String> {
    let config = ExportJobConfig::load(job)?;
    let mut records = load_records(input)?;
    records.truncate(limit);

    let csv = match config.field_mapping() {
        Some(mapping) => {
            let projected = project_fields(&records, Some(&mapping));
            serialize_to_csv(&projected, Some(mapping.headers().as_slice()))
        }
        None => convert_to_csv(&records, None),
    };
    Ok(csv)
}
