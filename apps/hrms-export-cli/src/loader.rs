use crate::error::{CliError, CliResult};
use csv::Reader;
use hrms_export::Record;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load records from a `.csv` file or a JSON document.
///
/// JSON may be an array of objects or a paged response whose `content`
/// field holds that array.
pub fn load_records(path: &Path) -> CliResult<Vec<Record>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_csv_records(path)
    } else {
        read_json_records(path)
    }
}

fn read_csv_records(path: &Path) -> CliResult<Vec<Record>> {
    let mut rdr = Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}

fn read_json_records(path: &Path) -> CliResult<Vec<Record>> {
    let file = File::open(path)?;
    let document: Value = serde_json::from_reader(BufReader::new(file))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut page) => match page.remove("content") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CliError::InvalidInput(format!(
                    "{}: expected an array of records or an object with a 'content' array",
                    path.display()
                )))
            }
        },
        _ => {
            return Err(CliError::InvalidInput(format!(
                "{}: expected an array of records",
                path.display()
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(CliError::InvalidInput(format!(
                "{}: record {} is not an object (found {})",
                path.display(),
                i + 1,
                other
            ))),
        })
        .collect()
}
