/*!
# Field Mapping & Projection

A [`FieldMapping`] declares the exported columns in order. Each column pulls
its value either from a (possibly dotted) source path or from a formatter
closure that sees the whole record.

Projection never fails: unresolvable paths produce an undefined cell.
*/

use crate::value::{resolve_path, ExportValue, Record};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Derives a cell value from a whole record
#[derive(Clone)]
pub struct Formatter(Arc<dyn Fn(&Record) -> Value + Send + Sync>);

impl Formatter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, record: &Record) -> Value {
        (self.0)(record)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(<fn>)")
    }
}

/// Where a column gets its value from
#[derive(Debug, Clone)]
pub enum FieldSource {
    /// Simple key or dotted path (`user.email`)
    Path(String),

    /// Computed value; always wins over key lookup
    Formatter(Formatter),
}

impl FieldSource {
    pub fn formatter<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        FieldSource::Formatter(Formatter::new(f))
    }

    fn project(&self, record: &Record) -> ExportValue {
        match self {
            FieldSource::Formatter(formatter) => Some(formatter.apply(record)),
            FieldSource::Path(path) => resolve_path(record, path),
        }
    }
}

impl From<&str> for FieldSource {
    fn from(path: &str) -> Self {
        FieldSource::Path(path.to_string())
    }
}

impl From<String> for FieldSource {
    fn from(path: String) -> Self {
        FieldSource::Path(path)
    }
}

impl From<Formatter> for FieldSource {
    fn from(formatter: Formatter) -> Self {
        FieldSource::Formatter(formatter)
    }
}

/// Ordered mapping from export column name to [`FieldSource`]
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    entries: Vec<(String, FieldSource)>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column.
    ///
    /// Re-inserting an existing column replaces its source but keeps its
    /// original position.
    pub fn insert(&mut self, column: impl Into<String>, source: impl Into<FieldSource>) {
        let column = column.into();
        let source = source.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = source,
            None => self.entries.push((column, source)),
        }
    }

    pub fn with_path(mut self, column: impl Into<String>, path: impl Into<String>) -> Self {
        self.insert(column, FieldSource::Path(path.into()));
        self
    }

    pub fn with_formatter<F>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.insert(column, FieldSource::formatter(f));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names in declared order
    pub fn headers(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSource)> {
        self.entries
            .iter()
            .map(|(name, source)| (name.as_str(), source))
    }

    fn project(&self, record: &Record) -> ProjectedRecord {
        ProjectedRecord {
            cells: self
                .entries
                .iter()
                .map(|(name, source)| (name.clone(), source.project(record)))
                .collect(),
        }
    }
}

impl<C, S> FromIterator<(C, S)> for FieldMapping
where
    C: Into<String>,
    S: Into<FieldSource>,
{
    fn from_iter<I: IntoIterator<Item = (C, S)>>(iter: I) -> Self {
        let mut mapping = FieldMapping::new();
        for (column, source) in iter {
            mapping.insert(column, source);
        }
        mapping
    }
}

/// A record after projection: ordered column name to cell value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedRecord {
    cells: Vec<(String, ExportValue)>,
}

impl ProjectedRecord {
    /// Cell for `column`, flattened so undefined and absent columns look alike
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn cells(&self) -> &[(String, ExportValue)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Identity projection onto `columns`, direct key lookup only
    fn from_record(record: &Record, columns: &[String]) -> Self {
        Self {
            cells: columns
                .iter()
                .map(|column| (column.clone(), record.get(column).cloned()))
                .collect(),
        }
    }
}

impl From<Record> for ProjectedRecord {
    fn from(record: Record) -> Self {
        Self {
            cells: record
                .into_iter()
                .map(|(name, value)| (name, Some(value)))
                .collect(),
        }
    }
}

/// Project `records` through `mapping`, preserving input order.
///
/// Without a mapping every record is projected onto the keys of the first
/// record. Records are expected to share that shape; extra keys on later
/// records are dropped and missing ones come out undefined.
pub fn project_fields(records: &[Record], mapping: Option<&FieldMapping>) -> Vec<ProjectedRecord> {
    let projected: Vec<ProjectedRecord> = match mapping {
        Some(mapping) => records.iter().map(|record| mapping.project(record)).collect(),
        None => {
            let Some(first) = records.first() else {
                return Vec::new();
            };
            let columns: Vec<String> = first.keys().cloned().collect();
            records
                .iter()
                .map(|record| ProjectedRecord::from_record(record, &columns))
                .collect()
        }
    };

    debug!(
        records = projected.len(),
        columns = mapping.map(FieldMapping::len),
        "projected records for export"
    );

    projected
}
